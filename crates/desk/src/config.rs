use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use advisor::remote::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use advisor::{GeminiConfig, RetryPolicy};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub workdir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_retries: parse(&get, "AI_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            base_backoff: parse(&get, "AI_RETRY_BACKOFF_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_backoff),
        };

        Ok(Self {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: parse(&get, "AI_TIMEOUT_SECS")?.map(Duration::from_secs),
            retry,
            workdir: get("WORKDIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.workdir.join("sqlitedata").join("desk.db")
    }

    /// A missing key is passed through as blank and rejected by the client.
    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}
