use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{GeneIdentifiers, Namespace};
use crate::error::KiraError;

static NCBI_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());
static UNIPROT_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9:]").unwrap());

/// One row of the database link table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseLink {
    pub database: String,
    pub url: String,
    #[serde(default)]
    pub search: String,
}

impl DatabaseLink {
    pub fn new(database: &str, url: &str, search: &str) -> Self {
        Self {
            database: database.to_string(),
            url: url.to_string(),
            search: search.to_string(),
        }
    }
}

/// Which enrichment path a link map came from; each path strips a different
/// character set from identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOrigin {
    Ncbi,
    Uniprot,
}

impl LinkOrigin {
    pub fn sanitize(self, id: &str) -> String {
        let disallowed = match self {
            LinkOrigin::Ncbi => &*NCBI_DISALLOWED,
            LinkOrigin::Uniprot => &*UNIPROT_DISALLOWED,
        };
        disallowed.replace_all(id, "").into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplates {
    rows: Vec<DatabaseLink>,
}

impl LinkTemplates {
    pub fn new(rows: Vec<DatabaseLink>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[DatabaseLink] {
        &self.rows
    }

    /// First row whose database name matches, ignoring case.
    pub fn lookup(&self, database: &str) -> Option<&DatabaseLink> {
        self.rows
            .iter()
            .find(|row| row.database.to_uppercase() == database.to_uppercase())
    }

    pub fn missing_namespaces(&self) -> Vec<Namespace> {
        Namespace::ALL
            .into_iter()
            .filter(|ns| self.lookup(ns.label()).is_none())
            .collect()
    }

    pub fn render(
        &self,
        namespace: Namespace,
        id: &str,
        origin: LinkOrigin,
    ) -> Result<String, KiraError> {
        let row = self
            .lookup(namespace.label())
            .ok_or_else(|| KiraError::MissingLinkConfig(namespace.label().to_string()))?;
        Ok(format!("{}{}{}", row.url, row.search, origin.sanitize(id)))
    }

    pub fn render_all(
        &self,
        ids: &GeneIdentifiers,
        origin: LinkOrigin,
    ) -> Result<BTreeMap<Namespace, String>, KiraError> {
        ids.iter()
            .map(|(namespace, id)| Ok((*namespace, self.render(*namespace, id, origin)?)))
            .collect()
    }
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self::new(default_database_links())
    }
}

pub fn default_database_links() -> Vec<DatabaseLink> {
    vec![
        DatabaseLink::new("NCBI Gene", "http://identifiers.org/ncbigene/", ""),
        DatabaseLink::new("Gene Cards", "http://identifiers.org/genecards/", ""),
        DatabaseLink::new("Uniprot", "http://identifiers.org/uniprot/", ""),
        DatabaseLink::new("HGNC", "http://identifiers.org/hgnc/", ""),
    ]
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn sanitizers_differ_by_origin() {
        assert_eq!(LinkOrigin::Uniprot.sanitize("P04637;"), "P04637");
        assert_eq!(LinkOrigin::Uniprot.sanitize("HGNC:11998"), "HGNC:11998");
        assert_eq!(LinkOrigin::Ncbi.sanitize("HGNC:11998"), "HGNC11998");
        assert_eq!(LinkOrigin::Ncbi.sanitize("HLA-DRB_1 "), "HLA-DRB_1");
        assert_eq!(LinkOrigin::Uniprot.sanitize("HLA-DRB_1"), "HLADRB1");
    }

    #[test]
    fn lookup_ignores_case() {
        let templates = LinkTemplates::new(vec![DatabaseLink::new(
            "gene cards",
            "https://www.genecards.org/",
            "cgi-bin/carddisp.pl?gene=",
        )]);
        let url = templates
            .render(Namespace::GeneCards, "TP53", LinkOrigin::Ncbi)
            .unwrap();
        assert_eq!(url, "https://www.genecards.org/cgi-bin/carddisp.pl?gene=TP53");
    }

    #[test]
    fn missing_row_is_an_error() {
        let templates = LinkTemplates::new(Vec::new());
        let err = templates
            .render(Namespace::Hgnc, "11998", LinkOrigin::Ncbi)
            .unwrap_err();
        assert_matches!(err, KiraError::MissingLinkConfig(db) if db == "HGNC");
        assert_eq!(templates.missing_namespaces().len(), 4);
    }

    #[test]
    fn renders_every_identifier() {
        let mut ids = GeneIdentifiers::new();
        ids.insert(Namespace::NcbiGene, "7157".to_string());
        ids.insert(Namespace::Uniprot, "P04637;".to_string());
        let links = LinkTemplates::default()
            .render_all(&ids, LinkOrigin::Uniprot)
            .unwrap();
        assert_eq!(links[&Namespace::NcbiGene], "http://identifiers.org/ncbigene/7157");
        assert_eq!(links[&Namespace::Uniprot], "http://identifiers.org/uniprot/P04637");
        assert!(LinkTemplates::default().missing_namespaces().is_empty());
    }
}
