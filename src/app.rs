use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::domain::SearchTerm;
use crate::enrichment::enrich;
use crate::error::KiraError;
use crate::gene_query::NamespaceQuery;
use crate::landing::LandingBox;
use crate::links::LinkTemplates;
use crate::merge::resolve_term;
use crate::ncbi::BulkNcbiInfo;
use crate::pathways::{EntityReferenceSearch, resolve_unrecognized};
use crate::uniprot::BulkUniprotInfo;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub term: String,
    pub resolved_at: String,
    pub records: Vec<LandingBox>,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Search pipeline over four upstream clients.
#[derive(Clone)]
pub struct App<Q, S, N, U>
where
    Q: NamespaceQuery,
    S: EntityReferenceSearch,
    N: BulkNcbiInfo,
    U: BulkUniprotInfo,
{
    gene_query: Q,
    search: S,
    ncbi: N,
    uniprot: U,
    links: LinkTemplates,
}

impl<Q, S, N, U> App<Q, S, N, U>
where
    Q: NamespaceQuery,
    S: EntityReferenceSearch,
    N: BulkNcbiInfo,
    U: BulkUniprotInfo,
{
    pub fn new(gene_query: Q, search: S, ncbi: N, uniprot: U, links: LinkTemplates) -> Self {
        Self {
            gene_query,
            search,
            ncbi,
            uniprot,
            links,
        }
    }

    /// Resolves a term into landing boxes. Any upstream failure aborts the
    /// whole search; a term nothing resolves yields an empty record list.
    pub fn search(
        &self,
        term: &SearchTerm,
        sink: &dyn ProgressSink,
    ) -> Result<SearchResult, KiraError> {
        let start = Instant::now();

        sink.event(ProgressEvent {
            message: format!("phase=Resolve; querying namespaces for {term}"),
            elapsed: None,
        });
        let merged = resolve_term(&self.gene_query, term)?;

        sink.event(ProgressEvent {
            message: format!(
                "phase=Fallback; {} unrecognized term(s)",
                merged.unrecognized().len()
            ),
            elapsed: Some(start.elapsed()),
        });
        let fallback = resolve_unrecognized(&self.search, merged)?;

        sink.event(ProgressEvent {
            message: format!("phase=Enrich; {} gene(s)", fallback.genes.len()),
            elapsed: Some(start.elapsed()),
        });
        let records = enrich(&self.ncbi, &self.uniprot, &fallback.genes, &self.links)?;

        sink.event(ProgressEvent {
            message: format!("phase=Assemble; {} record(s)", records.len()),
            elapsed: Some(start.elapsed()),
        });
        info!(
            term = %term,
            records = records.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "search finished"
        );

        Ok(SearchResult {
            term: term.as_str().to_string(),
            resolved_at: chrono::Utc::now().to_rfc3339(),
            records,
            unresolved: fallback.unresolved,
        })
    }
}
