pub mod app;
pub mod config;
pub mod domain;
pub mod enrichment;
pub mod error;
pub mod gene_query;
pub mod join;
pub mod landing;
pub mod links;
pub mod merge;
pub mod ncbi;
pub mod output;
pub mod pathways;
pub mod uniprot;
