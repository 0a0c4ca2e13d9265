//! Upstream probing
//!
//! A probe issues one GET against the upstream and reports whether the
//! response signals "online": status 200 and a body containing the match
//! string.

pub mod http;

pub use http::{HttpProber, PROBE_TIMEOUT};

/// Outcome of a single probe
#[derive(Debug, Clone, Default)]
pub struct ProbeResult {
    /// Whether the upstream is considered online
    pub matched: bool,
    /// Response body, empty unless the upstream answered 200
    pub body: String,
    /// Transport-level failure, if the request never completed
    pub error: Option<ProbeError>,
}

impl ProbeResult {
    /// Upstream answered 200
    pub fn ok(matched: bool, body: impl Into<String>) -> Self {
        Self {
            matched,
            body: body.into(),
            error: None,
        }
    }

    /// Upstream answered with anything other than 200
    pub fn soft_offline() -> Self {
        Self::default()
    }

    /// Request did not complete
    pub fn failed(error: ProbeError) -> Self {
        Self {
            matched: false,
            body: String::new(),
            error: Some(error),
        }
    }

    /// Text to report for this probe: the error if there was one, else the body
    pub fn text(&self) -> String {
        match &self.error {
            Some(e) => e.to_string(),
            None => self.body.clone(),
        }
    }
}

/// Something that can observe the upstream state
#[allow(async_fn_in_trait)]
pub trait Prober {
    async fn probe(&self, url: &str, match_string: &str) -> ProbeResult;
}

/// Probe errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Upstream request failed: {0}")]
    Request(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prefers_error() {
        let result = ProbeResult::failed(ProbeError::Request("connection refused".to_string()));
        assert_eq!(result.text(), "Upstream request failed: connection refused");
        assert!(!result.matched);
        assert!(result.body.is_empty());

        let result = ProbeResult::ok(true, "modem: registered");
        assert_eq!(result.text(), "modem: registered");
    }

    #[test]
    fn test_soft_offline_has_no_error() {
        let result = ProbeResult::soft_offline();
        assert!(!result.matched);
        assert!(result.error.is_none());
        assert_eq!(result.text(), "");
    }
}
