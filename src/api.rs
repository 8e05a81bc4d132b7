use leptos::logging::log;
use reqwest::{Client, StatusCode};

use crate::error::ClientError;
use crate::types::{HealthReport, OptimizationRequest, OptimizationResult};

/// The remote optimization service.
#[allow(async_fn_in_trait)]
pub trait OptimizerApi {
    async fn health(&self) -> Result<HealthReport, ClientError>;
    async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

fn status_error(status: StatusCode, message: Option<String>) -> ClientError {
    match message.filter(|m| !m.trim().is_empty()) {
        Some(message) => ClientError::Api {
            status: Some(status.as_u16()),
            message,
        },
        None => ClientError::from_status(status.as_u16(), status.canonical_reason()),
    }
}

impl OptimizerApi for HttpApi {
    async fn health(&self) -> Result<HealthReport, ClientError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), status.canonical_reason()));
        }

        response
            .json::<HealthReport>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, ClientError> {
        log!(
            "[INFO] [API] Starting optimization: style={}, target={}, length={}",
            request.prompt_style.as_str(),
            request.target_ai.as_str(),
            request.raw_prompt.chars().count()
        );

        let response = self
            .client
            .post(self.url("/optimize"))
            .json(request)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let response_text = response.text().await.map_err(network)?;

        match serde_json::from_str::<OptimizationResult>(&response_text) {
            Ok(result) if status.is_success() && !result.is_error() => Ok(result),
            Ok(result) => Err(status_error(status, result.message)),
            Err(_) if !status.is_success() => Err(status_error(status, None)),
            Err(e) => Err(ClientError::InvalidResponse(e.to_string())),
        }
    }
}
