use crate::config::OracleConfig;
use crate::models::OracleAnswer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// The external system under evaluation.
///
/// The harness only consumes answers; whatever sits behind this trait
/// (retrieval, generation, prompt plumbing) is interchangeable, including
/// deterministic stubs in tests.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Ask one question and return the generated answer with its sources.
    async fn answer(&self, question: &str) -> Result<OracleAnswer>;
}

/// HTTP adapter for an oracle service speaking the consultation contract:
/// POST the question as `{"pregunta": ...}`, receive
/// `{"respuesta": ..., "fuentes": [...]}`.
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOracle {
    /// Build a client honoring the configured per-request timeout.
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn answer(&self, question: &str) -> Result<OracleAnswer> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "pregunta": question }))
            .send()
            .await
            .with_context(|| format!("Oracle request failed: {}", self.endpoint))?;

        let response = response
            .error_for_status()
            .with_context(|| format!("Oracle returned an error status: {}", self.endpoint))?;

        response
            .json::<OracleAnswer>()
            .await
            .context("Failed to decode oracle response")
    }
}
