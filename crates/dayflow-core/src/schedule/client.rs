//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One request per generation, no retries. Failures are typed where they
//! happen: an invalid key becomes [`PlannerError::CredentialInvalid`], anything
//! else [`PlannerError::Generation`].

use std::time::Duration;

use log::{debug, info};
use reqwest::Client;

use super::{
    response::{
        classify_error, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        RequestContent, RequestPart,
    },
    schema::response_schema,
};
use crate::{
    error::{PlannerError, Result},
    models::{DayPlan, Pricing, TokenUsage, GEMINI_FLASH_PRICING},
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TEMPERATURE: f64 = 0.4;

/// Configuration for the schedule generation client.
#[derive(Debug, Clone)]
pub struct ScheduleClientConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub temperature: f64,
    /// Prices used for the cost estimate
    pub pricing: Pricing,
}

impl Default for ScheduleClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            pricing: GEMINI_FLASH_PRICING,
        }
    }
}

/// Result of one successful generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSchedule {
    pub plan: DayPlan,
    pub usage: TokenUsage,
    pub model: String,
}

/// Client for the Gemini `generateContent` endpoint.
///
/// Each call is a single request; nothing is retried.
#[derive(Debug, Clone)]
pub struct ScheduleClient {
    config: ScheduleClientConfig,
    client: Client,
}

impl ScheduleClient {
    pub fn new(config: ScheduleClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlannerError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Sends `prompt` and parses the reply into a day plan.
    pub async fn generate(&self, api_key: &str, prompt: &str) -> Result<GeneratedSchedule> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        };

        debug!("Requesting schedule from model {}", self.config.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PlannerError::generation(format!("Failed to reach the model API: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::generation(format!("Failed to read the model reply: {e}")))?;

        let plan = reply.day_plan()?;
        let usage = reply.token_usage(&self.config.pricing);
        info!(
            "Generated schedule with {} items ({} tokens)",
            plan.item_count(),
            usage.total_tokens
        );

        Ok(GeneratedSchedule {
            plan,
            usage,
            model: self.config.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::error::FailureKind;

    const KEY: &str = "AIzaSyA1234567890abcdefghijklmnop";

    async fn client_for(server: &MockServer) -> ScheduleClient {
        ScheduleClient::new(ScheduleClientConfig {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    fn reply(plan: serde_json::Value) -> serde_json::Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": plan.to_string() }] } }],
            "usageMetadata": {
                "promptTokenCount": 1000,
                "candidatesTokenCount": 500,
                "totalTokenCount": 1500
            }
        })
    }

    #[tokio::test]
    async fn test_generate_parses_plan_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", KEY))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json", "temperature": 0.4 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(json!({
                "morning": [{ "time": "09:00", "taskTitle": "Write", "type": "work", "duration": 60 }],
                "afternoon": [],
                "evening": [],
                "tips": ["Start early"]
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let generated = client_for(&server).await.generate(KEY, "plan my day").await.unwrap();
        assert_eq!(generated.plan.morning[0].task_title, "Write");
        assert_eq!(generated.usage.total_tokens, 1500);
        let expected_cost = 1000.0 * 0.075 / 1e6 + 500.0 * 0.30 / 1e6;
        assert!((generated.usage.estimated_cost - expected_cost).abs() < 1e-12);
        assert_eq!(generated.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_generate_maps_invalid_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{ "reason": "API_KEY_INVALID" }]
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate(KEY, "p").await.unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::CredentialInvalid);
    }

    #[tokio::test]
    async fn test_generate_maps_server_error_to_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate(KEY, "p").await.unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::GenericFailure);
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_plan() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "not json" }] } }]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.generate(KEY, "p").await.unwrap_err();
        assert!(matches!(err, PlannerError::Generation { .. }));
    }
}
