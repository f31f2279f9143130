//! The outbound HTTP call.

use crate::config::DeliveryConfig;
use crate::entities::{Headers, WebhookDeliveryStatus};
use reqwest::header::{CONTENT_TYPE, HeaderMap, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

/// Most of a response body that is kept. The rest is never read.
pub const MAX_RESPONSE_BODY_BYTES: usize = 64 * 1024;

/// What happened on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint answered, with any status.
    Responded {
        status: u16,
        body: String,
        headers: Headers,
    },
    /// No response: invalid URL, DNS, connect, TLS, timeout.
    NoResponse { error: String },
}

impl DeliveryOutcome {
    /// Only a 2xx answer counts as delivered.
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Responded { status, .. } if (200..300).contains(status))
    }

    pub fn status(&self) -> WebhookDeliveryStatus {
        if self.is_success() {
            WebhookDeliveryStatus::Success
        } else {
            WebhookDeliveryStatus::Failed
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            DeliveryOutcome::Responded { status, .. } => Some(*status),
            DeliveryOutcome::NoResponse { .. } => None,
        }
    }
}

/// POSTs serialized envelopes to subscriber endpoints.
///
/// One attempt per call; retries belong to the scheduler.
#[derive(Debug, Clone)]
pub struct DeliveryExecutor {
    client: reqwest::Client,
    user_agent: String,
}

impl DeliveryExecutor {
    /// Build an executor with its own client, bounded by `config.timeout`.
    pub fn new(config: &DeliveryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build webhook HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self::with_client(client, config.user_agent())
    }

    pub fn with_client(client: reqwest::Client, user_agent: String) -> Self {
        Self { client, user_agent }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The headers every request carries, as recorded in the ledger.
    pub fn request_headers(&self) -> Headers {
        Headers::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), self.user_agent.clone()),
        ])
    }

    /// POST `body` to `url`.
    ///
    /// Never errors: anything that prevents a response comes back as
    /// [`DeliveryOutcome::NoResponse`].
    pub async fn send(&self, url: &str, body: String) -> DeliveryOutcome {
        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                return DeliveryOutcome::NoResponse {
                    error: format!("invalid url: {e}"),
                };
            }
        };

        let response = match self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return DeliveryOutcome::NoResponse {
                    error: e.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = read_capped_body(response).await;

        DeliveryOutcome::Responded {
            status,
            body,
            headers,
        }
    }
}

/// Read up to [`MAX_RESPONSE_BODY_BYTES`] of the body.
async fn read_capped_body(mut response: reqwest::Response) -> String {
    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_RESPONSE_BODY_BYTES - body.len();
                if chunk.len() >= room {
                    body.extend_from_slice(&chunk[..room]);
                    break;
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            // A body that fails mid-read still has a status worth recording.
            Err(e) => {
                debug!(error = %e, "Failed to read webhook response body");
                break;
            }
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// Flatten a header map, joining repeated headers with `", "`.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}
