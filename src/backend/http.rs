//! HTTP backend speaking the ATPInsight JSON API.
//!
//! - `POST /verify` `{access_code}` → 401 means rejected
//! - `POST /ask` `{question, access_code?}` → `{answer, sources}`
//! - `GET /health` → `{status: "ok"}`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;

use super::client::{BackendError, QaBackend};
use super::types::{AskRequest, AskResponse, HealthResponse, VerifyOutcome, VerifyRequest};
use crate::core::config::ResolvedConfig;

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    /// Only 2xx from `/verify` counts as accepted when set.
    strict_verify: bool,
}

impl HttpBackend {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        strict_verify: bool,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            client,
            strict_verify,
        })
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, BackendError> {
        Self::new(
            config.base_url.clone(),
            config.request_timeout,
            config.strict_verify,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-success response into `BackendError::Api`, keeping the body for the log.
async fn api_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    BackendError::Api { status, message }
}

#[async_trait]
impl QaBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn verify(&self, access_code: &str) -> Result<VerifyOutcome, BackendError> {
        info!("Verify request: {}", self.url("/verify"));

        let response = self
            .client
            .post(self.url("/verify"))
            .json(&VerifyRequest { access_code })
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Verify response status: {}", status);

        if status == StatusCode::UNAUTHORIZED {
            return Ok(VerifyOutcome::Rejected);
        }
        if !status.is_success() {
            if self.strict_verify {
                return Err(api_error(response).await);
            }
            // Lenient contract: anything but 401 lets the user in
            warn!("Verify returned HTTP {}; treating as accepted", status.as_u16());
        }
        Ok(VerifyOutcome::Accepted)
    }

    async fn ask(&self, request: &AskRequest) -> Result<String, BackendError> {
        info!(
            "Ask request: {} (question_len={}, access_code={})",
            self.url("/ask"),
            request.question.len(),
            request.access_code.is_some()
        );

        let response = self
            .client
            .post(self.url("/ask"))
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Ask response status: {}", response.status());

        if !response.status().is_success() {
            let err = api_error(response).await;
            warn!("Ask failed: {}", err);
            return Err(err);
        }

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let parsed: AskResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))?;

        debug!(
            "Ask answered: {} bytes, {} sources",
            parsed.answer.len(),
            parsed.source_count()
        );
        Ok(parsed.answer)
    }

    async fn health(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        if health.status != "ok" {
            return Err(BackendError::Parse(format!(
                "unexpected health status: {}",
                health.status
            )));
        }
        Ok(())
    }
}
