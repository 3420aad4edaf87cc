//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{PlannerError, Result},
    models::{DayPlan, Pricing, TokenUsage},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent<'a> {
    pub role: &'static str,
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestPart<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: Value,
    pub temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
    #[serde(default)]
    pub total_token_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
}

impl ApiError {
    pub fn is_invalid_key(&self) -> bool {
        self.details
            .iter()
            .any(|detail| detail.reason.as_deref() == Some("API_KEY_INVALID"))
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Token usage, with absent counters read as zero.
    pub fn token_usage(&self, pricing: &Pricing) -> TokenUsage {
        let usage = self.usage_metadata.as_ref();
        TokenUsage::new(
            usage.map_or(0, |u| u.prompt_token_count),
            usage.map_or(0, |u| u.candidates_token_count),
            usage.map_or(0, |u| u.total_token_count),
            pricing,
        )
    }

    /// Parses the reply text into a day plan.
    pub fn day_plan(&self) -> Result<DayPlan> {
        let text = self.text();
        if text.trim().is_empty() {
            return Err(PlannerError::generation("No response from the model"));
        }
        serde_json::from_str(&text).map_err(|e| {
            PlannerError::generation(format!("Model returned a malformed schedule: {e}"))
        })
    }
}

/// Maps a non-success HTTP reply to a typed error.
pub(crate) fn classify_error(status: u16, body: &str) -> PlannerError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|envelope| envelope.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let invalid_key = matches!(status, 401 | 403)
        || parsed
            .as_ref()
            .is_some_and(|envelope| envelope.error.is_invalid_key());

    if invalid_key {
        return PlannerError::CredentialInvalid { reason: message };
    }

    let status_name = parsed
        .and_then(|envelope| envelope.error.status)
        .map(|s| format!(" {s}"))
        .unwrap_or_default();
    PlannerError::generation(format!("API error ({status}{status_name}): {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::models::GEMINI_FLASH_PRICING;

    #[test]
    fn test_text_parts_are_concatenated() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"morning\":[],"},{"text":"\"tips\":[\"x\"]}"}]}}]}"#,
        )
        .unwrap();
        let plan = response.day_plan().unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.tips, ["x"]);
    }

    #[test]
    fn test_missing_usage_reads_as_zero() {
        let response = GenerateContentResponse::default();
        let usage = response.token_usage(&GEMINI_FLASH_PRICING);
        assert_eq!(usage.total_tokens, 0);
        assert_eq!(usage.estimated_cost, 0.0);
    }

    #[test]
    fn test_empty_reply_is_generation_error() {
        let err = GenerateContentResponse::default().day_plan().unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::GenericFailure);
    }

    #[test]
    fn test_classify_invalid_key_reason() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}"#;
        let err = classify_error(400, body);
        assert_eq!(err.failure_kind(), FailureKind::CredentialInvalid);
    }

    #[test]
    fn test_classify_other_errors_as_generic() {
        assert_eq!(classify_error(403, "").failure_kind(), FailureKind::CredentialInvalid);

        let err = classify_error(
            429,
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert_eq!(err.failure_kind(), FailureKind::GenericFailure);
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED"));

        let err = classify_error(500, "upstream exploded");
        assert!(err.to_string().contains("upstream exploded"));
    }
}
