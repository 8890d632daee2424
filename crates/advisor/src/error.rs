use thiserror::Error;

pub const SIGNAL_FAILURE_MESSAGE: &str = "Failed to get analysis from AI. The model may be overloaded or the content may have been blocked.";
pub const NEWS_FAILURE_MESSAGE: &str = "Failed to fetch news from AI. The model may be overloaded or the content may have been blocked.";
pub const MISSING_KEY_MESSAGE: &str = "No AI API key configured. Set GEMINI_API_KEY and try again.";

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("AI response was empty or blocked")]
    EmptyResponse,
    #[error("no JSON object or array found in AI response")]
    NoStructureFound,
    #[error("AI response contains malformed JSON: {source}")]
    MalformedContent {
        /// The located JSON candidate, for diagnostics only.
        content: String,
        #[source]
        source: serde_json::Error,
    },
    /// Missing or unrecognised `direction`; empty when the field was absent.
    /// Every other field defaults once the JSON parses, so rejecting here is
    /// the one place the normalizer refuses a partial signal. Product policy:
    /// a guessed direction would be a fabricated trade call.
    #[error("AI response has an unknown trade direction: {0:?}")]
    UnknownDirection(String),
}

impl NormalizeError {
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyResponse => "empty_response",
            Self::NoStructureFound => "structure_not_found",
            Self::MalformedContent { .. } => "malformed_content",
            Self::UnknownDirection(_) => "unknown_direction",
        }
    }
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("request to AI service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AI service unavailable (HTTP {status})")]
    Unavailable { status: u16 },
    #[error("AI service rejected the request (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("no API key configured for the AI service")]
    MissingApiKey,
}

impl AdvisorError {
    /// Transport failures and overload answers retry. A reply that arrived is final.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Unavailable { .. })
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Unavailable { .. } => "unavailable",
            Self::Api { .. } => "api",
            Self::Normalize(e) => e.category(),
            Self::MissingApiKey => "missing_api_key",
        }
    }

    /// Message shown when a signal request fails. Normalizer categories share
    /// one message; the logs carry the detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => MISSING_KEY_MESSAGE,
            _ => SIGNAL_FAILURE_MESSAGE,
        }
    }

    pub fn news_user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => MISSING_KEY_MESSAGE,
            _ => NEWS_FAILURE_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_level_failures_retry() {
        assert!(AdvisorError::Unavailable { status: 503 }.is_retryable());
        assert!(!AdvisorError::Normalize(NormalizeError::EmptyResponse).is_retryable());
        assert!(
            !AdvisorError::Api {
                status: 400,
                body: "bad".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn categories_distinguish_normalizer_failures() {
        let malformed = serde_json::from_str::<serde_json::Value>("{x}").unwrap_err();
        let err = AdvisorError::from(NormalizeError::MalformedContent {
            content: "{x}".to_string(),
            source: malformed,
        });
        assert_eq!(err.category(), "malformed_content");
        assert_eq!(
            AdvisorError::from(NormalizeError::NoStructureFound).category(),
            "structure_not_found"
        );
    }

    #[test]
    fn normalizer_failures_share_one_user_message() {
        let messages: Vec<_> = [
            NormalizeError::EmptyResponse,
            NormalizeError::NoStructureFound,
            NormalizeError::UnknownDirection("HOLD".to_string()),
        ]
        .into_iter()
        .map(|e| AdvisorError::from(e).user_message())
        .collect();

        assert!(messages.iter().all(|m| *m == SIGNAL_FAILURE_MESSAGE));
        assert_eq!(
            AdvisorError::from(NormalizeError::EmptyResponse).news_user_message(),
            NEWS_FAILURE_MESSAGE
        );
        assert_eq!(AdvisorError::MissingApiKey.user_message(), MISSING_KEY_MESSAGE);
    }
}
