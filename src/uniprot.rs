use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::KiraError;

/// One entry of the EBI Proteins API `proteins?accession=` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotEntry {
    pub accession: String,
    #[serde(default)]
    pub gene: Vec<UniprotGene>,
    #[serde(default)]
    pub comments: Vec<UniprotComment>,
    #[serde(default)]
    pub db_references: Vec<DbReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UniprotGene {
    #[serde(default)]
    pub name: Option<EvidencedValue>,
    #[serde(default)]
    pub synonyms: Vec<EvidencedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EvidencedValue {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UniprotComment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Vec<EvidencedValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DbReference {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl UniprotEntry {
    /// Name of the first listed gene.
    pub fn gene_name(&self) -> Option<&str> {
        self.gene
            .first()
            .and_then(|gene| gene.name.as_ref())
            .map(|name| name.value.as_str())
    }

    pub fn gene_synonyms(&self) -> Vec<&str> {
        self.gene
            .first()
            .map(|gene| gene.synonyms.iter().map(|syn| syn.value.as_str()).collect())
            .unwrap_or_default()
    }

    /// First text of the first `FUNCTION` comment.
    pub fn function_text(&self) -> Option<&str> {
        self.comments
            .iter()
            .find(|comment| comment.kind == "FUNCTION")
            .and_then(|comment| comment.text.first())
            .map(|text| text.value.as_str())
    }
}

pub trait BulkUniprotInfo: Send + Sync {
    fn proteins(&self, accessions: &[String]) -> Result<Vec<UniprotEntry>, KiraError>;
}

#[derive(Clone)]
pub struct UniprotHttpClient {
    client: Client,
    base_url: String,
}

impl UniprotHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, KiraError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-gr/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KiraError::UniprotHttp(err.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| KiraError::UniprotHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn proteins_url(&self) -> String {
        format!("{}/proteins", self.base_url)
    }
}

impl BulkUniprotInfo for UniprotHttpClient {
    fn proteins(&self, accessions: &[String]) -> Result<Vec<UniprotEntry>, KiraError> {
        let joined = accessions.join(",");
        let response = self
            .client
            .get(self.proteins_url())
            .query(&[("accession", joined.as_str())])
            .send()
            .map_err(|err| KiraError::UniprotHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "UniProt request failed".to_string());
            return Err(KiraError::UniprotStatus { status, message });
        }
        response
            .json()
            .map_err(|err| KiraError::UniprotHttp(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_comes_from_first_function_comment() {
        let payload = r#"{
            "accession": "P04637",
            "gene": [{"name": {"value": "TP53"}, "synonyms": [{"value": "P53"}]}],
            "comments": [
                {"type": "SUBUNIT", "text": [{"value": "Forms homodimers."}]},
                {"type": "FUNCTION", "text": [{"value": "Acts as a tumor suppressor."}]},
                {"type": "FUNCTION", "text": [{"value": "Second function."}]}
            ],
            "dbReferences": [{"type": "HGNC", "id": "HGNC:11998"}]
        }"#;
        let entry: UniprotEntry = serde_json::from_str(payload).unwrap();
        assert_eq!(entry.gene_name(), Some("TP53"));
        assert_eq!(entry.gene_synonyms(), vec!["P53"]);
        assert_eq!(entry.function_text(), Some("Acts as a tumor suppressor."));
        assert_eq!(entry.db_references[0].kind, "HGNC");
    }

    #[test]
    fn sparse_entry_parses() {
        let entry: UniprotEntry = serde_json::from_str(r#"{"accession": "Q9XYZ1"}"#).unwrap();
        assert_eq!(entry.gene_name(), None);
        assert_eq!(entry.function_text(), None);
        assert!(entry.gene_synonyms().is_empty());
    }
}
