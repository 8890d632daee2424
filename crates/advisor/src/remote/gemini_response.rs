use serde::{Deserialize, Serialize};

use common::models::GroundingCitation;

use crate::traits::{OracleReply, RemoteResponse};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

#[derive(Debug, Default, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Default, Serialize)]
pub struct GoogleSearch {}

impl<'a> GenerateContentRequest<'a> {
    pub fn grounded(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool::default()],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
pub struct WebChunk {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

impl RemoteResponse<OracleReply> for GenerateContentResponse {
    fn to_domain(&self) -> OracleReply {
        let Some(candidate) = self.candidates.first() else {
            return OracleReply::default();
        };

        let text = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<String>();

        let citations = candidate
            .grounding_metadata
            .iter()
            .flat_map(|m| m.grounding_chunks.iter())
            .map(|chunk| match &chunk.web {
                Some(web) => GroundingCitation {
                    title: web.title.clone(),
                    uri: web.uri.clone(),
                },
                None => GroundingCitation::default(),
            })
            .collect();

        OracleReply { text, citations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_parts_and_keeps_chunk_order() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"direction\":"}, {"text": " \"BUY\"}"}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example", "title": "A"}},
                        {"retrievedContext": {}},
                        {"web": {"uri": "https://b.example"}}
                    ]
                }
            }]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let reply = response.to_domain();

        assert_eq!(reply.text, r#"{"direction": "BUY"}"#);
        assert_eq!(
            reply.citations,
            vec![
                GroundingCitation::new("A", "https://a.example"),
                GroundingCitation::default(),
                GroundingCitation {
                    title: None,
                    uri: Some("https://b.example".to_string())
                },
            ]
        );
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.block_reason(), Some("SAFETY"));
        assert_eq!(response.to_domain(), OracleReply::default());
    }

    #[test]
    fn request_enables_search_grounding() {
        let json = serde_json::to_value(GenerateContentRequest::grounded("hi")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json["tools"][0]["google_search"].is_object());
    }
}
