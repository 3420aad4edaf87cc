//! Calls to the social-login provider.

use std::time::Duration;

use axum::http::StatusCode;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::RelayConfig,
    error::{RelayError, Result},
};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Token response in the shape the broker expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderToken {
    access_token: Option<String>,
    expires_in: Option<Value>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

impl From<ProviderToken> for TokenResponse {
    fn from(token: ProviderToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            refresh_token: token.refresh_token,
            scope: token.scope,
        }
    }
}

/// OIDC-style profile claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Option<String>,
    pub sub: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: String,
    pub picture: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub locale: String,
}

#[derive(Debug, Deserialize)]
struct ProviderProfile {
    id: Option<Value>,
    name: Option<String>,
    picture: Option<Value>,
    email: Option<String>,
}

impl From<ProviderProfile> for UserInfo {
    fn from(profile: ProviderProfile) -> Self {
        // Ids may arrive as numbers or strings.
        let id = profile.id.map(|id| match id {
            Value::String(s) => s,
            other => other.to_string(),
        });
        let picture = profile
            .picture
            .as_ref()
            .and_then(|p| p.pointer("/data/url"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            sub: id.clone(),
            id,
            given_name: profile.name.clone(),
            name: profile.name,
            family_name: String::new(),
            avatar_url: picture.clone(),
            picture,
            email: profile.email,
            email_verified: false,
            locale: "vi".to_string(),
        }
    }
}

/// Whether a provider body reports an error. Zero, `false`, empty and null
/// mean success.
fn error_flag(body: &Value) -> bool {
    match body.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Builds the pass-through error for a failed provider call.
fn provider_error(status: StatusCode, body: &Value, fallback: &str) -> RelayError {
    let error = body.get("error");
    // Profile errors nest as {error: {code, message}}.
    let (code, nested_message) = match error {
        Some(Value::Object(inner)) => (
            inner.get("code").and_then(as_text),
            inner.get("message").and_then(as_text),
        ),
        Some(value) => (as_text(value), None),
        None => (None, None),
    };
    let description = body
        .get("error_description")
        .and_then(as_text)
        .or(nested_message)
        .or_else(|| body.get("message").and_then(as_text))
        .unwrap_or_else(|| format!("Provider request failed ({fallback})"));

    RelayError::Provider {
        status: if status.is_success() {
            StatusCode::BAD_REQUEST
        } else {
            status
        },
        error: code.unwrap_or_else(|| fallback.to_string()),
        description,
    }
}

/// HTTP client bound to one provider application.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    app_id: String,
    secret_key: String,
    token_url: String,
    userinfo_url: String,
}

impl ProviderClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            app_id: config.app_id.clone(),
            secret_key: config.secret_key.clone(),
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
        })
    }

    /// Sends `request` and returns the JSON body of a successful reply.
    async fn send(request: RequestBuilder, fallback: &str) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| RelayError::Upstream(format!("Provider unreachable: {e}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Upstream(format!("Failed to read provider reply: {e}")))?;
        debug!("Provider replied {status} ({fallback})");

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => Value::Null,
            Err(e) => {
                return Err(RelayError::Upstream(format!(
                    "Provider returned malformed JSON: {e}"
                )))
            }
        };

        if !status.is_success() || error_flag(&body) {
            return Err(provider_error(status, &body, fallback));
        }
        Ok(body)
    }

    fn token_request(&self, form: &[(&str, &str)]) -> RequestBuilder {
        self.client
            .post(&self.token_url)
            .header("secret_key", &self.secret_key)
            .form(form)
    }

    /// Exchanges an authorization code and PKCE verifier for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
        grant_type: &str,
    ) -> Result<TokenResponse> {
        let request = self.token_request(&[
            ("app_id", self.app_id.as_str()),
            ("code", code),
            ("grant_type", grant_type),
            ("code_verifier", code_verifier),
        ]);
        let body = Self::send(request, "token_exchange_failed").await?;
        parse_token(body)
    }

    pub async fn refresh(&self, refresh_token: &str, grant_type: &str) -> Result<TokenResponse> {
        let request = self.token_request(&[
            ("app_id", self.app_id.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", grant_type),
        ]);
        let body = Self::send(request, "token_refresh_failed").await?;
        parse_token(body)
    }

    /// Fetches the profile behind `access_token`.
    pub async fn user_info(&self, access_token: &str) -> Result<UserInfo> {
        let request = self
            .client
            .get(&self.userinfo_url)
            .query(&[("fields", "id,name,picture")])
            .header("access_token", access_token);
        let body = Self::send(request, "userinfo_failed").await?;
        let profile: ProviderProfile = serde_json::from_value(body)
            .map_err(|e| RelayError::Upstream(format!("Unexpected profile shape: {e}")))?;
        Ok(profile.into())
    }
}

fn parse_token(body: Value) -> Result<TokenResponse> {
    let token: ProviderToken = serde_json::from_value(body)
        .map_err(|e| RelayError::Upstream(format!("Unexpected token shape: {e}")))?;
    Ok(token.into())
}
