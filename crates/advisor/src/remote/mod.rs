pub mod gemini_client;
pub mod gemini_response;

pub use gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiConfig};
pub use gemini_response::GenerateContentResponse;
