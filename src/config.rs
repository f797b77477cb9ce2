use std::fs;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::KiraError;
use crate::links::{DatabaseLink, LinkTemplates, default_database_links};

pub const CONFIG_FILE_NAME: &str = "kira-gr.json";

const DEFAULT_GENE_QUERY_URL: &str = "https://apps.pathwaycommons.org/api/gene-query";
const DEFAULT_PATHWAY_COMMONS_SEARCH_URL: &str = "https://www.pathwaycommons.org/pc2/search.json";
const DEFAULT_EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_PROTEINS_BASE: &str = "https://www.ebi.ac.uk/proteins/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub databases: Option<Vec<DatabaseLink>>,
    #[serde(default)]
    pub endpoints: EndpointsEntry,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointsEntry {
    #[serde(default)]
    pub gene_query: Option<String>,
    #[serde(default)]
    pub pathway_commons_search: Option<String>,
    #[serde(default)]
    pub ncbi_eutils: Option<String>,
    #[serde(default)]
    pub uniprot_proteins: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub gene_query: String,
    pub pathway_commons_search: String,
    pub ncbi_eutils: String,
    pub uniprot_proteins: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gene_query: DEFAULT_GENE_QUERY_URL.to_string(),
            pathway_commons_search: DEFAULT_PATHWAY_COMMONS_SEARCH_URL.to_string(),
            ncbi_eutils: DEFAULT_EUTILS_BASE.to_string(),
            uniprot_proteins: DEFAULT_PROTEINS_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub source: Option<Utf8PathBuf>,
    pub links: LinkTemplates,
    pub endpoints: Endpoints,
    pub timeout: Duration,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            source: None,
            links: LinkTemplates::default(),
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads an explicit config path, or the first of `./kira-gr.json` and
    /// the user config directory that exists, or built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, KiraError> {
        let config_path = match path {
            Some(path) => Some(Utf8PathBuf::from(path)),
            None => Self::discover(),
        };
        let Some(config_path) = config_path else {
            debug!("no config file found, using defaults");
            return Ok(ResolvedConfig::default());
        };
        Self::load(&config_path)
    }

    pub fn load(path: &Utf8Path) -> Result<ResolvedConfig, KiraError> {
        let content =
            fs::read_to_string(path).map_err(|_| KiraError::ConfigRead(path.to_path_buf()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| KiraError::ConfigParse(err.to_string()))?;
        let mut resolved = Self::resolve_config(config);
        resolved.source = Some(path.to_path_buf());
        debug!(path = %path, "loaded config");
        Ok(resolved)
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            gene_query: config.endpoints.gene_query.unwrap_or(defaults.gene_query),
            pathway_commons_search: config
                .endpoints
                .pathway_commons_search
                .unwrap_or(defaults.pathway_commons_search),
            ncbi_eutils: config.endpoints.ncbi_eutils.unwrap_or(defaults.ncbi_eutils),
            uniprot_proteins: config
                .endpoints
                .uniprot_proteins
                .unwrap_or(defaults.uniprot_proteins),
        };

        let links = LinkTemplates::new(config.databases.unwrap_or_else(default_database_links));
        for namespace in links.missing_namespaces() {
            warn!(database = %namespace, "no link configuration; links for it will fail");
        }

        ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            source: None,
            links,
            endpoints,
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }

    fn discover() -> Option<Utf8PathBuf> {
        let local = Utf8PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        ProjectDirs::from("", "", "kira-gene-resolver")
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.config_dir().join(CONFIG_FILE_NAME)).ok())
            .filter(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Namespace;

    #[test]
    fn empty_config_uses_defaults() {
        let resolved = ConfigLoader::resolve_config(Config::default());
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.endpoints, Endpoints::default());
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert!(resolved.links.missing_namespaces().is_empty());
    }

    #[test]
    fn partial_endpoints_override_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"endpoints": {"ncbi_eutils": "http://localhost:8080/eutils"}, "timeout_secs": 5}"#,
        )
        .unwrap();
        let resolved = ConfigLoader::resolve_config(config);
        assert_eq!(resolved.endpoints.ncbi_eutils, "http://localhost:8080/eutils");
        assert_eq!(resolved.endpoints.uniprot_proteins, DEFAULT_PROTEINS_BASE);
        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn database_table_replaces_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"databases": [{"database": "HGNC", "url": "https://www.genenames.org/", "search": "data/gene-symbol-report/#!/hgnc_id/"}]}"#,
        )
        .unwrap();
        let resolved = ConfigLoader::resolve_config(config);
        assert_eq!(resolved.links.rows().len(), 1);
        assert_eq!(resolved.links.missing_namespaces().len(), 3);
        assert!(!resolved.links.missing_namespaces().contains(&Namespace::Hgnc));
    }
}
