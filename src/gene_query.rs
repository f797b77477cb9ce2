use std::collections::HashSet;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AliasMap, GeneIdentifiers, Namespace, SearchTerm};
use crate::error::KiraError;

/// One gene-query response for a single target namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNamespaceResult {
    #[serde(default)]
    pub gene_info: Vec<GeneInfo>,
    #[serde(default)]
    pub unrecognized: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneInfo {
    pub initial_alias: String,
    pub converted_alias: String,
}

/// Aliases resolved by one namespace plus the terms it could not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceAliases {
    pub namespace: Namespace,
    pub aliases: AliasMap,
    pub unrecognized: Vec<String>,
}

pub trait NamespaceQuery: Send + Sync {
    fn query(
        &self,
        term: &SearchTerm,
        namespace: Namespace,
    ) -> Result<RawNamespaceResult, KiraError>;
}

/// Turns a raw response into an alias map.
///
/// Only the first entry for each converted alias is kept. An alias seen again
/// with a new converted alias replaces its earlier mapping in place.
pub fn resolve_aliases(namespace: Namespace, raw: RawNamespaceResult) -> NamespaceAliases {
    let mut seen = HashSet::new();
    let mut aliases = AliasMap::new();
    for info in raw.gene_info {
        if !seen.insert(info.converted_alias.clone()) {
            debug!(
                namespace = %namespace,
                alias = %info.initial_alias,
                converted = %info.converted_alias,
                "dropping duplicate converted alias"
            );
            continue;
        }
        let mut ids = GeneIdentifiers::new();
        ids.insert(namespace, info.converted_alias);
        aliases.insert(info.initial_alias, ids);
    }
    NamespaceAliases {
        namespace,
        aliases,
        unrecognized: raw.unrecognized,
    }
}

#[derive(Debug, Serialize)]
struct GeneQueryRequest<'a> {
    genes: &'a str,
    target: &'a str,
}

#[derive(Clone)]
pub struct GeneQueryHttpClient {
    client: Client,
    endpoint: String,
}

impl GeneQueryHttpClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, KiraError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("kira-gr/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| KiraError::GeneQueryHttp(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl NamespaceQuery for GeneQueryHttpClient {
    fn query(
        &self,
        term: &SearchTerm,
        namespace: Namespace,
    ) -> Result<RawNamespaceResult, KiraError> {
        let body = GeneQueryRequest {
            genes: term.as_str(),
            target: namespace.query_target(),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|err| KiraError::GeneQueryHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "gene query failed".to_string());
            return Err(KiraError::GeneQueryStatus { status, message });
        }
        response
            .json()
            .map_err(|err| KiraError::GeneQueryHttp(err.to_string()))
    }
}
