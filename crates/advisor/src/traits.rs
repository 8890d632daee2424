use async_trait::async_trait;
use common::models::GroundingCitation;

use crate::AdvisorError;

pub trait RemoteResponse<T> {
    fn to_domain(&self) -> T;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OracleReply {
    pub text: String,
    pub citations: Vec<GroundingCitation>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisOracle: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<OracleReply, AdvisorError>;
}
