use std::time::Duration;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use storage::dto::submission::{SubmissionAnalysis, SubmissionEvaluation};

use crate::error::{EvaluatorError, Result};
use crate::models::{AnalysisRequest, EvaluationRequest, HealthResponse};
use crate::traits::SubmissionEvaluator;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Client for the evaluation service's JSON API
pub struct HttpEvaluator {
    client: Client,
    base_url: String,
}

impl HttpEvaluator {
    /// Create a new evaluator client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the evaluation service (e.g., "http://127.0.0.1:5000")
    /// * `timeout` - Per-request timeout; file analysis can take minutes
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvaluatorError::ServiceError(format!(
                "{} returned {}: {}",
                path, status, error_text
            )));
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str(&text)?;
        Ok(parsed)
    }
}

impl Default for HttpEvaluator {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SubmissionEvaluator for HttpEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<SubmissionEvaluation> {
        tracing::info!(
            "Requesting evaluation for submission {} ({}, {}, {} criteria)",
            request.submission_id,
            request.team_name,
            request.file_type,
            request.criteria.len()
        );

        self.post_json("/evaluate", request).await
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<SubmissionAnalysis> {
        tracing::info!(
            "Requesting analysis for submission {} ({})",
            request.submission_id,
            request.team_name
        );

        self.post_json("/analyze", request).await
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let health: HealthResponse = response.json().await.unwrap_or(HealthResponse { status: None });
        if let Some(status) = health.status {
            tracing::debug!("Evaluation service reports status: {}", status);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpEvaluator::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    #[ignore] // Only run when the evaluation service is running
    async fn test_health_check() {
        let client = HttpEvaluator::default();
        let result = client.health_check().await;
        assert!(result.is_ok());
    }
}
