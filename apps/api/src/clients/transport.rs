//! Shared HTTP plumbing for the upstream clients.
//!
//! Every outbound call goes through [`Transport`]: it attaches the service's
//! API key, retries 429s and 5xx responses with exponential backoff, and
//! decodes the body as JSON. The typed clients stay thin on top of this.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} response could not be decoded: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} still failing after {retries} attempts")]
    Exhausted { service: &'static str, retries: u32 },
}

impl UpstreamError {
    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Transport { service, .. }
            | UpstreamError::Api { service, .. }
            | UpstreamError::Decode { service, .. }
            | UpstreamError::Exhausted { service, .. } => service,
        }
    }
}

/// How a service expects its API key.
#[derive(Debug, Clone)]
pub enum AuthScheme {
    Bearer,
    Header(&'static str),
}

/// A reqwest wrapper bound to one upstream service.
#[derive(Clone)]
pub struct Transport {
    service: &'static str,
    client: Client,
    base_url: String,
    api_key: String,
    auth: AuthScheme,
}

impl Transport {
    pub fn new(
        service: &'static str,
        base_url: &str,
        api_key: &str,
        auth: AuthScheme,
    ) -> Self {
        Self {
            service,
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            auth,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        self.request(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// POST with no body, for action endpoints like pause/resume.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        self.request(Method::POST, path, &[], None::<&()>).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    /// Sends one request, retrying on 429 and 5xx with exponential backoff.
    /// Non-retryable error statuses surface the upstream message.
    async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error: Option<UpstreamError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Backoff: 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "{} call attempt {} failed, retrying after {}ms...",
                    self.service,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.request(method.clone(), &url);
            request = match &self.auth {
                AuthScheme::Bearer => request.bearer_auth(&self.api_key),
                AuthScheme::Header(name) => request.header(*name, &self.api_key),
            };
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(UpstreamError::Transport {
                        service: self.service,
                        source: e,
                    });
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("{} returned {}: {}", self.service, status, body);
                last_error = Some(UpstreamError::Api {
                    service: self.service,
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(UpstreamError::Api {
                    service: self.service,
                    status: status.as_u16(),
                    message: extract_error_message(&body),
                });
            }

            let text = response.text().await.map_err(|e| UpstreamError::Transport {
                service: self.service,
                source: e,
            })?;

            debug!("{} {} {} -> {}", self.service, method, path, status);

            return serde_json::from_str(&text).map_err(|e| UpstreamError::Decode {
                service: self.service,
                source: e,
            });
        }

        Err(last_error.unwrap_or(UpstreamError::Exhausted {
            service: self.service,
            retries: MAX_RETRIES,
        }))
    }
}

/// Pulls a human-readable message out of a JSON error body. The three vendors
/// disagree on shape (`{"message"}`, `{"error": "..."}`, `{"error":{"message"}}`),
/// so try each before falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(String::from)
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_field() {
        assert_eq!(
            extract_error_message(r#"{"message": "Campaign not found"}"#),
            "Campaign not found"
        );
    }

    #[test]
    fn test_extract_nested_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "invalid stage"}}"#),
            "invalid stage"
        );
    }

    #[test]
    fn test_extract_error_string() {
        assert_eq!(
            extract_error_message(r#"{"error": "no such person"}"#),
            "no such person"
        );
    }

    #[test]
    fn test_extract_falls_back_to_raw_body() {
        assert_eq!(extract_error_message("plain text failure"), "plain text failure");
        assert_eq!(extract_error_message(r#"{"detail": 42}"#), r#"{"detail": 42}"#);
    }
}
