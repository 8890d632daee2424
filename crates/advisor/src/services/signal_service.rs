use chrono::Utc;
use tracing::{debug, error, info};

use common::models::Signal;

use super::{RetryPolicy, call_with_retry};
use crate::normalizer::normalize_signal;
use crate::traits::AnalysisOracle;
use crate::{AdvisorError, NormalizeError, prompts};

pub struct SignalService<O> {
    oracle: O,
    retry: RetryPolicy,
}

impl<O: AnalysisOracle> SignalService<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn generate_signal(&self, asset_name: &str) -> Result<Signal, AdvisorError> {
        info!("Requesting analysis for {}", asset_name);
        let prompt = prompts::signal_prompt(asset_name);

        let reply = call_with_retry(&self.oracle, &prompt, &self.retry)
            .await
            .inspect_err(|e| error!("Signal request for {} failed [{}]: {}", asset_name, e.category(), e))?;

        let signal = normalize_signal(&reply.text, &reply.citations, asset_name, Utc::now())
            .inspect_err(|e| log_normalize_failure(asset_name, e))?;

        info!(
            "Signal for {}: {} @ {} ({}% confidence, {} sources)",
            signal.asset_name,
            signal.direction,
            signal.entry_price,
            signal.confidence,
            signal.sources.len()
        );
        Ok(signal)
    }
}

pub(crate) fn log_normalize_failure(context: &str, e: &NormalizeError) {
    error!("Could not normalize AI reply for {} [{}]: {}", context, e.category(), e);
    if let NormalizeError::MalformedContent { content, .. } = e {
        debug!("Offending content: {}", content);
    }
}
