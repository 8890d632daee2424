use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, warn};

use crate::remote::gemini_response::{GenerateContentRequest, GenerateContentResponse};
use crate::traits::{AnalysisOracle, OracleReply, RemoteResponse};
use crate::AdvisorError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// `None` leaves the request unbounded.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AdvisorError> {
        if config.api_key.trim().is_empty() {
            return Err(AdvisorError::MissingApiKey);
        }

        let mut builder = Client::builder().user_agent(concat!("ai-signal-desk/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint(&config.base_url, &config.model),
            api_key: config.api_key,
        })
    }
}

/// 429 and 5xx are transient; any other non-success status is final.
fn status_error(status: StatusCode, body: String) -> Option<AdvisorError> {
    if status.is_success() {
        return None;
    }
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        warn!("Gemini unavailable: HTTP {}", status);
        return Some(AdvisorError::Unavailable {
            status: status.as_u16(),
        });
    }
    error!("Gemini request failed: HTTP {} {}", status, body);
    Some(AdvisorError::Api {
        status: status.as_u16(),
        body,
    })
}

fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

#[async_trait]
impl AnalysisOracle for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<OracleReply, AdvisorError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::grounded(prompt))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            if let Some(err) = status_error(status, body) {
                return Err(err);
            }
            unreachable!("status_error maps every non-success status to an error");
        }

        let response = resp.json::<GenerateContentResponse>().await?;
        if let Some(reason) = response.block_reason() {
            warn!("Gemini blocked the prompt: {}", reason);
        }

        let reply = response.to_domain();
        debug!(
            "Gemini replied with {} chars and {} grounding chunks",
            reply.text.len(),
            reply.citations.len()
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("https://generativelanguage.googleapis.com/", DEFAULT_MODEL),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let result = GeminiClient::new(GeminiConfig::new("  "));
        assert!(matches!(result, Err(AdvisorError::MissingApiKey)));
    }

    #[test]
    fn builds_with_key_and_timeout() {
        let config = GeminiConfig {
            timeout: Some(Duration::from_secs(30)),
            ..GeminiConfig::new("test-key")
        };
        let client = GeminiClient::new(config).unwrap();
        assert!(client.endpoint.ends_with("gemini-2.5-flash:generateContent"));
    }

    #[test]
    fn overload_statuses_are_unavailable_and_retryable() {
        for code in [429, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = status_error(status, String::new()).unwrap();
            assert!(matches!(err, AdvisorError::Unavailable { status } if status == code));
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn client_errors_are_final_api_errors() {
        for code in [400, 403] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = status_error(status, "API key not valid".to_string()).unwrap();
            assert!(matches!(
                &err,
                AdvisorError::Api { status, body } if *status == code && body == "API key not valid"
            ));
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn success_is_not_an_error() {
        assert!(status_error(StatusCode::OK, String::new()).is_none());
    }
}
