use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::traits::{AnalysisOracle, OracleReply};
use crate::AdvisorError;

pub mod news_service;
pub mod signal_service;

pub use news_service::NewsService;
pub use signal_service::SignalService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based): base, 2*base, 4*base...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

async fn call_with_retry(
    oracle: &dyn AnalysisOracle,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<OracleReply, AdvisorError> {
    let mut attempt = 0;
    loop {
        match oracle.generate(prompt).await {
            Ok(reply) => return Ok(reply),
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff(attempt);
                warn!(
                    "AI call failed ({}), retrying in {:?} (attempt {}/{})",
                    e, delay, attempt, policy.max_retries
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
