//! SPARQL execution engines

use std::time::Duration;

use async_trait::async_trait;
use geoqa_types::SparqlResults;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use crate::config::SparqlSettings;
use crate::error::ExecutionError;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Runs one query string and returns the SPARQL JSON result
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn execute(&self, query: &str) -> Result<SparqlResults, ExecutionError>;

    /// Endpoint identifier, for logs
    fn endpoint(&self) -> &str;
}

/// SPARQL 1.1 protocol client (POST, form-encoded `query`)
pub struct HttpSparqlEngine {
    client: Client,
    endpoint: String,
}

impl HttpSparqlEngine {
    pub fn new(settings: &SparqlSettings) -> Result<Self, ExecutionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| ExecutionError::Transport {
                endpoint: settings.endpoint.clone(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl QueryEngine for HttpSparqlEngine {
    async fn execute(&self, query: &str) -> Result<SparqlResults, ExecutionError> {
        debug!("POST {} ({} bytes)", self.endpoint, query.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|source| ExecutionError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ExecutionError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ExecutionError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ExecutionError::Decode {
            endpoint: self.endpoint.clone(),
            source,
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
