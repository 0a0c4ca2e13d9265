//! HTTP prober

use std::time::Duration;

use reqwest::StatusCode;

use super::{ProbeError, ProbeResult, Prober};

/// Fixed timeout for the upstream request
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Probes the upstream with a plain GET
#[derive(Debug, Clone)]
pub struct HttpProber {
    http_client: reqwest::Client,
}

impl HttpProber {
    pub fn new() -> Result<Self, ProbeError> {
        Self::with_timeout(PROBE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ProbeError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self { http_client })
    }
}

impl Prober for HttpProber {
    async fn probe(&self, url: &str, match_string: &str) -> ProbeResult {
        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Upstream request failed");
                return ProbeResult::failed(ProbeError::Request(e.to_string()));
            }
        };

        let status = response.status();
        tracing::info!(url = %url, status = %status, "Upstream responded");
        tracing::debug!(headers = ?response.headers(), "Upstream response headers");

        // Anything but 200 counts as offline without an error, even if the body is broken
        if status != StatusCode::OK {
            match response.text().await {
                Ok(body) => tracing::debug!(body = %body, "Upstream response body"),
                Err(e) => tracing::debug!(error = %e, "Failed to read upstream body"),
            }
            return ProbeResult::soft_offline();
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to read upstream body");
                return ProbeResult::failed(ProbeError::Request(e.to_string()));
            }
        };
        tracing::debug!(body = %body, "Upstream response body");

        let matched = body.contains(match_string);
        ProbeResult::ok(matched, body)
    }
}
