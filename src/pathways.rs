use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::KiraError;
use crate::join::try_join_all;
use crate::merge::MergedGenes;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "searchHit")]
    pub search_hit: Vec<SearchHit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "biopaxClass")]
    pub biopax_class: Option<String>,
}

pub trait EntityReferenceSearch: Send + Sync {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>, KiraError>;
}

/// Result of the fallback stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackOutcome {
    pub genes: MergedGenes,
    /// Unrecognized aliases the search could not map to an accession.
    pub unresolved: Vec<String>,
}

/// UniProt accession carried by a resource URI such as
/// `http://identifiers.org/uniprot/P04637`: the last path segment, when the
/// segment before it is `uniprot`.
pub fn uniprot_accession_from_uri(uri: &str) -> Option<&str> {
    let mut segments = uri.split('/').rev();
    let accession = segments.next()?;
    let namespace = segments.next()?;
    (namespace == "uniprot" && !accession.is_empty()).then_some(accession)
}

/// Searches every unrecognized alias that the merge did not resolve and adds
/// the accession taken from the first hit.
///
/// Searches run concurrently; any failing search fails the stage.
pub fn resolve_unrecognized<S: EntityReferenceSearch>(
    client: &S,
    genes: MergedGenes,
) -> Result<FallbackOutcome, KiraError> {
    let mut pending: Vec<String> = Vec::new();
    for alias in genes.unrecognized() {
        if !genes.contains_alias(alias) && !pending.contains(alias) {
            pending.push(alias.clone());
        }
    }
    if pending.is_empty() {
        return Ok(FallbackOutcome {
            genes,
            unresolved: Vec::new(),
        });
    }

    let tasks = pending
        .iter()
        .map(|alias| {
            move || -> Result<Option<String>, KiraError> {
                let hits = client.search(alias)?;
                let accession = hits
                    .first()
                    .and_then(|hit| uniprot_accession_from_uri(&hit.uri))
                    .map(str::to_string);
                debug!(alias = %alias, hits = hits.len(), accession = ?accession, "fallback search");
                Ok(accession)
            }
        })
        .collect::<Vec<_>>();
    let accessions = try_join_all(tasks)?;

    let mut genes = genes;
    let mut unresolved = Vec::new();
    for (alias, accession) in pending.into_iter().zip(accessions) {
        match accession {
            Some(accession) => genes = genes.with_fallback_accession(&alias, &accession),
            None => unresolved.push(alias),
        }
    }
    info!(
        resolved = genes.len(),
        unresolved = unresolved.len(),
        "fallback search finished"
    );
    Ok(FallbackOutcome { genes, unresolved })
}

#[derive(Clone)]
pub struct PathwayCommonsHttpClient {
    client: Client,
    search_url: String,
}

impl PathwayCommonsHttpClient {
    pub fn new(search_url: &str, timeout: Duration) -> Result<Self, KiraError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("kira-gr/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| KiraError::PathwayCommonsHttp(err.to_string()))?;
        Ok(Self {
            client,
            search_url: search_url.to_string(),
        })
    }
}

impl EntityReferenceSearch for PathwayCommonsHttpClient {
    fn search(&self, term: &str) -> Result<Vec<SearchHit>, KiraError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", term), ("type", "entityreference")])
            .send()
            .map_err(|err| KiraError::PathwayCommonsHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Pathway Commons search failed".to_string());
            return Err(KiraError::PathwayCommonsStatus { status, message });
        }
        let body: SearchResponse = response
            .json()
            .map_err(|err| KiraError::PathwayCommonsHttp(err.to_string()))?;
        Ok(body.search_hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accession_follows_uniprot_segment() {
        assert_eq!(
            uniprot_accession_from_uri("http://identifiers.org/uniprot/P04637"),
            Some("P04637")
        );
        assert_eq!(
            uniprot_accession_from_uri("http://identifiers.org/chebi/CHEBI:15377"),
            None
        );
        assert_eq!(uniprot_accession_from_uri("http://identifiers.org/uniprot/"), None);
        assert_eq!(uniprot_accession_from_uri("P04637"), None);
    }

    #[test]
    fn parses_search_payload() {
        let payload = r#"{
            "searchHit": [
                {"uri": "http://identifiers.org/uniprot/P04637", "name": "P53_HUMAN", "biopaxClass": "ProteinReference"}
            ],
            "numHits": 1
        }"#;
        let response: SearchResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.search_hit.len(), 1);
        assert_eq!(response.search_hit[0].name.as_deref(), Some("P53_HUMAN"));

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.search_hit.is_empty());
    }
}
