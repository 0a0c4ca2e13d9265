//! Email relay dispatcher

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use super::{AlertDispatcher, AlertMessage};
use crate::config::RelayConfig;

/// Fixed timeout for the relay request
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends alerts through a Mailgun-compatible HTTP relay
pub struct MailgunRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

/// Form body expected by the relay
#[derive(Debug, Serialize)]
struct RelayForm<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl MailgunRelay {
    pub fn new(config: RelayConfig) -> Result<Self, DispatchError> {
        Self::with_timeout(config, DISPATCH_TIMEOUT)
    }

    pub fn with_timeout(config: RelayConfig, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// `Authorization` value: the api key is encoded verbatim
    fn authorization(&self) -> String {
        format!("Basic {}", STANDARD.encode(&self.config.api_key))
    }
}

impl AlertDispatcher for MailgunRelay {
    async fn send(&self, message: &AlertMessage) -> Result<(), DispatchError> {
        let form = RelayForm {
            from: &self.config.from,
            to: &self.config.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.config.url)
            .header(AUTHORIZATION, self.authorization())
            .form(&form)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;

        let status = response.status();
        tracing::info!(url = %self.config.url, status = %status, "Relay responded");
        tracing::debug!(headers = ?response.headers(), "Relay response headers");

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read relay body");
                String::new()
            }
        };
        tracing::debug!(body = %body, "Relay response body");

        if !status.is_success() {
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(subject = %message.subject, "Alert sent");

        Ok(())
    }
}

/// Dispatch errors
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Failed to reach relay: {0}")]
    Network(String),

    #[error("Relay returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{refused_url, serve};
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Form, Router,
    };
    use std::collections::HashMap;
    use tokio::sync::mpsc;

    type Captured = (Option<String>, Option<String>, HashMap<String, String>);

    fn relay_config(url: String) -> RelayConfig {
        RelayConfig {
            url,
            api_key: "api:key-3ax6xnjp29jd6fds4gc373sgvjxteol0".to_string(),
            from: "dongle@example.com".to_string(),
            to: "ops@example.com".to_string(),
        }
    }

    fn capturing_relay(tx: mpsc::UnboundedSender<Captured>) -> Router {
        Router::new().route(
            "/messages",
            post(move |headers: HeaderMap, Form(form): Form<HashMap<String, String>>| {
                let tx = tx.clone();
                async move {
                    let header = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    tx.send((header("authorization"), header("content-type"), form))
                        .unwrap();
                    "Queued. Thank you."
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_send_posts_form_with_basic_auth() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let base = serve(capturing_relay(tx)).await;
        let relay = MailgunRelay::new(relay_config(format!("{}/messages", base))).unwrap();

        let message = AlertMessage::new("GSM Dongle has gone offline", "connection refused & more");
        tokio_test::assert_ok!(relay.send(&message).await);

        let (auth, content_type, form) = rx.recv().await.unwrap();
        assert_eq!(
            auth.as_deref(),
            Some("Basic YXBpOmtleS0zYXg2eG5qcDI5amQ2ZmRzNGdjMzczc2d2anh0ZW9sMA==")
        );
        assert_eq!(content_type.as_deref(), Some("application/x-www-form-urlencoded"));
        assert_eq!(form.len(), 4);
        assert_eq!(form["from"], "dongle@example.com");
        assert_eq!(form["to"], "ops@example.com");
        assert_eq!(form["subject"], "GSM Dongle has gone offline");
        assert_eq!(form["text"], "connection refused & more");
    }

    #[tokio::test]
    async fn test_rejected_status_is_error() {
        let app = Router::new().route(
            "/messages",
            post(|| async { (StatusCode::UNAUTHORIZED, "Forbidden") }),
        );
        let base = serve(app).await;
        let relay = MailgunRelay::new(relay_config(format!("{}/messages", base))).unwrap();

        let err = relay
            .send(&AlertMessage::new("subject", "body"))
            .await
            .unwrap_err();
        match err {
            DispatchError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Forbidden");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_rejection_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\nshort")
                .await
                .unwrap();
            let _ = socket.shutdown().await;
        });

        let relay = MailgunRelay::new(relay_config(format!("http://{}/messages", addr))).unwrap();

        match relay.send(&AlertMessage::new("subject", "body")).await {
            Err(DispatchError::Rejected { status, body }) => {
                assert_eq!(status, 502);
                assert!(body.is_empty());
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_error() {
        let relay = MailgunRelay::new(relay_config(refused_url().await)).unwrap();

        let result = relay.send(&AlertMessage::new("subject", "body")).await;
        assert!(matches!(result, Err(DispatchError::Network(_))));
    }
}
