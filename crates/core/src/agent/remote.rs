use crate::agent::error::AgentError;
use crate::agent::registry::AnalystId;
use crate::agent::{AgentState, AnalystAgent, HedgeFundRun, Orchestrator};
use crate::config::Settings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Forwards analysis calls to a remote service that hosts the actual agents
/// and orchestration graph. This layer never retries: one request in, one
/// backend call out.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteBackend {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_analysis_backend_url()?.to_string();
        let api_key = settings.analysis_backend_api_key.clone();

        let timeout_secs = std::env::var("ANALYSIS_BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build analysis backend http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, AgentError> {
        let url = self.url(path);
        let headers = self.headers().map_err(AgentError::Failed)?;

        tracing::debug!(%url, "forwarding to analysis backend");

        let res = self
            .http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .with_context(|| format!("analysis backend request to {url} failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read analysis backend response")?;

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(AgentError::Invalid(detail_message(&text)));
        }
        if !status.is_success() {
            return Err(AgentError::Failed(anyhow::anyhow!(
                "analysis backend HTTP {status}: {text}"
            )));
        }

        let json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("analysis backend response is not valid JSON: {text}"))?;
        Ok(json)
    }
}

/// Pulls the human-readable message out of an upstream error body, falling
/// back to the raw text.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str().map(String::from)))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait::async_trait]
impl Orchestrator for RemoteBackend {
    async fn run(&self, run: HedgeFundRun) -> Result<Value, AgentError> {
        let body = serde_json::to_value(&run)
            .context("failed to serialize hedge fund run")
            .map_err(AgentError::Failed)?;
        self.post_json("run", &body).await
    }
}

/// One named analyst served by a [`RemoteBackend`].
#[derive(Debug, Clone)]
pub struct RemoteAnalyst {
    backend: RemoteBackend,
    id: AnalystId,
}

impl RemoteAnalyst {
    pub fn new(backend: RemoteBackend, id: AnalystId) -> Self {
        Self { backend, id }
    }
}

#[async_trait::async_trait]
impl AnalystAgent for RemoteAnalyst {
    fn name(&self) -> &'static str {
        self.id.as_str()
    }

    async fn analyze(&self, state: AgentState) -> Result<AgentState, AgentError> {
        let body = serde_json::to_value(&state)
            .context("failed to serialize agent state")
            .map_err(AgentError::Failed)?;

        let json = self
            .backend
            .post_json(&format!("agents/{}", self.id), &body)
            .await?;

        let state = serde_json::from_value::<AgentState>(json)
            .context("analysis backend returned a malformed agent state")
            .map_err(AgentError::Failed)?;
        Ok(state)
    }
}
