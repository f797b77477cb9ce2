use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::KiraError;

/// Identifier systems a search term is resolved against.
///
/// Variant order is the order namespaces are queried and merged in, and the
/// order links are listed in on a landing box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Namespace {
    #[serde(rename = "NCBI Gene")]
    NcbiGene,
    #[serde(rename = "Gene Cards")]
    GeneCards,
    #[serde(rename = "Uniprot")]
    Uniprot,
    #[serde(rename = "HGNC")]
    Hgnc,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::NcbiGene,
        Namespace::GeneCards,
        Namespace::Uniprot,
        Namespace::Hgnc,
    ];

    /// Display label; also the database name used for link configuration.
    pub fn label(self) -> &'static str {
        match self {
            Namespace::NcbiGene => "NCBI Gene",
            Namespace::GeneCards => "Gene Cards",
            Namespace::Uniprot => "Uniprot",
            Namespace::Hgnc => "HGNC",
        }
    }

    /// Target name understood by the gene-query service.
    pub fn query_target(self) -> &'static str {
        match self {
            Namespace::NcbiGene => "NCBIGENE",
            Namespace::GeneCards => "HGNCSYMBOL",
            Namespace::Uniprot => "UNIPROT",
            Namespace::Hgnc => "HGNC",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifiers one alias resolved to, keyed by namespace.
pub type GeneIdentifiers = BTreeMap<Namespace, String>;

/// Alias as typed or found, mapped to its identifiers. Keeps insertion order.
pub type AliasMap = IndexMap<String, GeneIdentifiers>;

/// A trimmed, non-empty search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SearchTerm {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(KiraError::InvalidSearchTerm(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn search_term_is_trimmed() {
        let term: SearchTerm = "  TP53 MDM2 \n".parse().unwrap();
        assert_eq!(term.as_str(), "TP53 MDM2");
    }

    #[test]
    fn blank_search_term_is_rejected() {
        let err = "   ".parse::<SearchTerm>().unwrap_err();
        assert_matches!(err, KiraError::InvalidSearchTerm(_));
    }

    #[test]
    fn namespace_labels_round_trip() {
        for ns in Namespace::ALL {
            assert_eq!(Namespace::from_label(ns.label()), Some(ns));
        }
        assert_eq!(Namespace::from_label("gene cards"), Some(Namespace::GeneCards));
        assert_eq!(Namespace::from_label("Ensembl"), None);
    }

    #[test]
    fn namespaces_serialize_as_labels() {
        let mut ids = GeneIdentifiers::new();
        ids.insert(Namespace::Hgnc, "11998".to_string());
        ids.insert(Namespace::NcbiGene, "7157".to_string());
        let json = serde_json::to_string(&ids).unwrap();
        assert_eq!(json, r#"{"NCBI Gene":"7157","HGNC":"11998"}"#);
    }
}
