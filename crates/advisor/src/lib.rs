pub mod error;
pub mod news;
pub mod normalizer;
pub mod prompts;
pub mod remote;
pub mod services;
pub mod traits;

pub use error::{AdvisorError, NormalizeError};
pub use remote::{GeminiClient, GeminiConfig};
pub use services::{NewsService, RetryPolicy, SignalService};
pub use traits::{AnalysisOracle, OracleReply};
