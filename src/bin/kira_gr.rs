use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use kira_gene_resolver::app::{App, SearchResult};
use kira_gene_resolver::config::{ConfigLoader, ResolvedConfig};
use kira_gene_resolver::domain::SearchTerm;
use kira_gene_resolver::error::KiraError;
use kira_gene_resolver::gene_query::GeneQueryHttpClient;
use kira_gene_resolver::landing::{Disclosure, toggle_disclosure};
use kira_gene_resolver::ncbi::NcbiHttpClient;
use kira_gene_resolver::output::{JsonOutput, OutputMode, StderrProgress, TextOutput};
use kira_gene_resolver::pathways::PathwayCommonsHttpClient;
use kira_gene_resolver::uniprot::UniprotHttpClient;

#[derive(Parser)]
#[command(name = "kira-gr")]
#[command(about = "Resolve gene names into NCBI Gene, HGNC and UniProt records")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search genes by name, symbol or accession")]
    Search(SearchArgs),
}

#[derive(Args)]
struct SearchArgs {
    term: String,

    /// Expand a text field on every record (repeatable)
    #[arg(long, value_enum)]
    expand: Vec<Disclosure>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kira) = report.downcast_ref::<KiraError>() {
            return ExitCode::from(map_exit_code(kira));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KiraError) -> u8 {
    match error {
        KiraError::InvalidSearchTerm(_)
        | KiraError::InvalidDisclosure(_)
        | KiraError::ConfigRead(_)
        | KiraError::ConfigParse(_)
        | KiraError::MissingLinkConfig(_) => 2,
        err if err.is_upstream() => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };
    let config = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Search(args) => run_search(args, &config, output_mode),
    }
}

fn run_search(
    args: SearchArgs,
    config: &ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let term: SearchTerm = args.term.parse()?;
    let endpoints = &config.endpoints;
    let app = App::new(
        GeneQueryHttpClient::new(&endpoints.gene_query, config.timeout)?,
        PathwayCommonsHttpClient::new(&endpoints.pathway_commons_search, config.timeout)?,
        NcbiHttpClient::new(&endpoints.ncbi_eutils, config.timeout)?,
        UniprotHttpClient::new(&endpoints.uniprot_proteins, config.timeout)?,
        config.links.clone(),
    );

    let mut result = match output_mode {
        OutputMode::NonInteractive => app.search(&term, &JsonOutput)?,
        OutputMode::Interactive => app.search(&term, &StderrProgress)?,
    };
    apply_expansions(&mut result, &args.expand);

    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_search(&result).into_diagnostic()?,
        OutputMode::Interactive => TextOutput::print_search(&result).into_diagnostic()?,
    }
    Ok(())
}

fn apply_expansions(result: &mut SearchResult, fields: &[Disclosure]) {
    for index in 0..result.records.len() {
        for field in fields {
            if !result.records[index].is_disclosed(*field) {
                toggle_disclosure(&mut result.records, index, *field);
            }
        }
    }
}
