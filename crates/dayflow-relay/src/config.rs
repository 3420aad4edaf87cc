//! Relay configuration loaded from the environment.

use std::env;

use url::Url;

use crate::error::{RelayError, Result};

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
pub const DEFAULT_COOKIE_PREFIX: &str = "zalo";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://oauth.zaloapp.com/v4/permission";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth.zaloapp.com/v4/access_token";
pub const DEFAULT_USERINFO_URL: &str = "https://graph.zalo.me/v2.0/me";

/// Minimum length of the cookie signing secret, in bytes.
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

/// Settings shared by every relay request. Built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Provider application id
    pub app_id: String,
    /// Provider secret, sent only in the token request header
    pub secret_key: String,
    /// HMAC key for session cookies
    pub cookie_secret: String,
    /// Externally visible base URL of this relay, without trailing slash
    pub public_url: String,
    pub cookie_prefix: String,
    pub secure_cookies: bool,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("app_id", &self.app_id)
            .field("public_url", &self.public_url)
            .field("cookie_prefix", &self.cookie_prefix)
            .field("secure_cookies", &self.secure_cookies)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("userinfo_url", &self.userinfo_url)
            .finish_non_exhaustive()
    }
}

impl RelayConfig {
    /// Loads `.env` if present, then reads `RELAY_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` when a required variable is
    /// missing or a value is malformed.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| RelayError::Configuration(format!("{key} is not set")))
        };
        let url_or = |key: &str, default: &str| -> Result<String> {
            let raw = get(key).unwrap_or_else(|| default.to_string());
            Url::parse(&raw)
                .map_err(|e| RelayError::Configuration(format!("{key} is not a valid URL: {e}")))?;
            Ok(raw.trim_end_matches('/').to_string())
        };

        let cookie_secret = required("RELAY_COOKIE_SECRET")?;
        if cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(RelayError::Configuration(format!(
                "RELAY_COOKIE_SECRET must be at least {MIN_COOKIE_SECRET_LEN} bytes"
            )));
        }

        let secure_cookies = match get("RELAY_SECURE_COOKIES").as_deref() {
            None => false,
            Some(value) => parse_flag(value).ok_or_else(|| {
                RelayError::Configuration(format!(
                    "RELAY_SECURE_COOKIES must be true or false, got {value}"
                ))
            })?,
        };

        Ok(Self {
            app_id: required("RELAY_APP_ID")?,
            secret_key: required("RELAY_SECRET_KEY")?,
            cookie_secret,
            public_url: url_or("RELAY_PUBLIC_URL", DEFAULT_PUBLIC_URL)?,
            cookie_prefix: get("RELAY_COOKIE_PREFIX")
                .unwrap_or_else(|| DEFAULT_COOKIE_PREFIX.to_string()),
            secure_cookies,
            authorize_url: url_or("RELAY_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL)?,
            token_url: url_or("RELAY_TOKEN_URL", DEFAULT_TOKEN_URL)?,
            userinfo_url: url_or("RELAY_USERINFO_URL", DEFAULT_USERINFO_URL)?,
        })
    }

    /// Where the provider sends the user back to.
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.public_url)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
