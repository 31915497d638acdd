//! [`AnalysisBackend`] over HTTP: each command is `POST {base}/invoke/{command}` with the
//! command's argument object as JSON.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::protocol::BackendCommand;
use tracing::debug;
use url::Url;

use crate::AnalysisBackend;

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow!("backend_url must start with http:// or https://"));
        }
        // Url::join replaces the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("invalid backend url: {base_url}"))?;
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn command_url(&self, command: &BackendCommand) -> Result<Url> {
        self.base_url
            .join(&format!("invoke/{}", command.name()))
            .with_context(|| format!("failed to build url for {}", command.name()))
    }

    async fn invoke<T: DeserializeOwned>(&self, command: BackendCommand) -> Result<T> {
        let name = command.name();
        let url = self.command_url(&command)?;
        debug!(command = name, %url, "invoking backend command");

        let response = self
            .http
            .post(url)
            .json(&command)
            .send()
            .await
            .with_context(|| format!("failed to reach backend for {name}"))?;

        let status = response.status();
        if !status.is_success() {
            // The body is the backend's own error message; pass it through untouched.
            let body = response.text().await.unwrap_or_default();
            debug!(command = name, %status, "backend command failed");
            if body.trim().is_empty() {
                return Err(anyhow!("backend returned {status} for {name}"));
            }
            return Err(anyhow!(body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!("invalid {name} response from backend: {e}"))
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn preview_read(&self, path: &str) -> Result<String> {
        self.invoke(BackendCommand::ReadFileStart {
            path: path.to_string(),
        })
        .await
    }

    async fn classify(&self, path: &str) -> Result<String> {
        self.invoke(BackendCommand::AnalyzeNat2 {
            path: path.to_string(),
        })
        .await
    }

    async fn export_transform(&self, payload: &str) -> Result<String> {
        self.invoke(BackendCommand::DownloadCsvResults {
            results_json: payload.to_string(),
        })
        .await
    }

    async fn persist(&self, destination: &str, content: &str) -> Result<()> {
        self.invoke(BackendCommand::WriteFile {
            path: destination.to_string(),
            content: content.to_string(),
        })
        .await
    }
}

#[cfg(test)]
#[path = "tests/http_backend_tests.rs"]
mod tests;
