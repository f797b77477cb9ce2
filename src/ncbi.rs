use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::KiraError;

/// `esummary.fcgi?db=gene` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NcbiSummaryResponse {
    #[serde(default)]
    pub result: NcbiSummaryResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NcbiSummaryResult {
    #[serde(default)]
    pub uids: Vec<String>,
    #[serde(flatten)]
    pub summaries: HashMap<String, NcbiGeneSummary>,
}

impl NcbiSummaryResult {
    pub fn summary(&self, uid: &str) -> Option<&NcbiGeneSummary> {
        self.summaries.get(uid)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NcbiGeneSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nomenclaturename: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub otheraliases: String,
}

pub trait BulkNcbiInfo: Send + Sync {
    fn gene_summaries(&self, ids: &[String]) -> Result<NcbiSummaryResult, KiraError>;
}

#[derive(Clone)]
pub struct NcbiHttpClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NcbiHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, KiraError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-gr/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KiraError::NcbiHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| KiraError::NcbiHttp(err.to_string()))?;

        let api_key = std::env::var("NCBI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn summary_url(&self) -> String {
        format!("{}/esummary.fcgi", self.base_url)
    }
}

impl BulkNcbiInfo for NcbiHttpClient {
    fn gene_summaries(&self, ids: &[String]) -> Result<NcbiSummaryResult, KiraError> {
        let joined = ids.join(",");
        let mut request = self.client.get(self.summary_url()).query(&[
            ("db", "gene"),
            ("retmode", "json"),
            ("id", joined.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }
        let response = request
            .send()
            .map_err(|err| KiraError::NcbiHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "NCBI request failed".to_string());
            return Err(KiraError::NcbiStatus { status, message });
        }
        let body: NcbiSummaryResponse = response
            .json()
            .map_err(|err| KiraError::NcbiHttp(err.to_string()))?;
        Ok(body.result)
    }
}
