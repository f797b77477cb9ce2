use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KiraError {
    #[error("invalid search term: {0:?}")]
    InvalidSearchTerm(String),

    #[error("invalid disclosure field: {0}")]
    InvalidDisclosure(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("gene query request failed: {0}")]
    GeneQueryHttp(String),

    #[error("gene query returned status {status}: {message}")]
    GeneQueryStatus { status: u16, message: String },

    #[error("Pathway Commons request failed: {0}")]
    PathwayCommonsHttp(String),

    #[error("Pathway Commons returned status {status}: {message}")]
    PathwayCommonsStatus { status: u16, message: String },

    #[error("NCBI request failed: {0}")]
    NcbiHttp(String),

    #[error("NCBI returned status {status}: {message}")]
    NcbiStatus { status: u16, message: String },

    #[error("uniprot request failed: {0}")]
    UniprotHttp(String),

    #[error("uniprot returned status {status}: {message}")]
    UniprotStatus { status: u16, message: String },

    #[error("no link configuration for database: {0}")]
    #[diagnostic(help("add a row for this database to the `databases` table of kira-gr.json"))]
    MissingLinkConfig(String),

    #[error("concurrent task panicked: {0}")]
    TaskPanicked(String),
}

impl KiraError {
    /// True for failures reported by (or on the way to) an upstream service.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            KiraError::GeneQueryHttp(_)
                | KiraError::GeneQueryStatus { .. }
                | KiraError::PathwayCommonsHttp(_)
                | KiraError::PathwayCommonsStatus { .. }
                | KiraError::NcbiHttp(_)
                | KiraError::NcbiStatus { .. }
                | KiraError::UniprotHttp(_)
                | KiraError::UniprotStatus { .. }
        )
    }
}
