//! Short-lived signed session cookies.
//!
//! Each cookie value is an HS256 JWT carrying the cookie's own name, the
//! stored value and an expiry. A token that fails verification, has expired
//! or was issued for another cookie name reads as absent.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderName, HeaderValue,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Lifetime of every session cookie, in seconds.
pub const COOKIE_TTL_SECS: i64 = 600;

/// The three values carried between relay requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCookie {
    CodeVerifier,
    RedirectUri,
    State,
}

impl SessionCookie {
    fn suffix(self) -> &'static str {
        match self {
            Self::CodeVerifier => "code_verifier",
            Self::RedirectUri => "redirect_uri",
            Self::State => "state",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CookieClaims {
    name: String,
    value: String,
    exp: i64,
}

/// Issues and verifies session cookies.
#[derive(Clone)]
pub struct CookieSigner {
    prefix: String,
    secure: bool,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CookieSigner {
    pub fn new(secret: &[u8], prefix: impl Into<String>, secure: bool) -> Self {
        Self {
            prefix: prefix.into(),
            secure,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Full cookie name, e.g. `zalo_state`.
    pub fn name(&self, cookie: SessionCookie) -> String {
        format!("{}_{}", self.prefix, cookie.suffix())
    }

    fn attributes(&self, max_age: i64) -> String {
        let mut attributes = format!("HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
        if self.secure {
            attributes.push_str("; Secure");
        }
        attributes
    }

    /// Signs `value` into a token valid until `now + ttl`.
    pub fn sign(&self, cookie: SessionCookie, value: &str, now: i64) -> Result<String> {
        let claims = CookieClaims {
            name: self.name(cookie),
            value: value.to_string(),
            exp: now + COOKIE_TTL_SECS,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| RelayError::Configuration(format!("Failed to sign cookie: {e}")))
    }

    /// A `Set-Cookie` header storing `value`.
    pub fn issue(&self, cookie: SessionCookie, value: &str) -> Result<(HeaderName, HeaderValue)> {
        let token = self.sign(cookie, value, jiff::Timestamp::now().as_second())?;
        let header = format!(
            "{}={token}; {}",
            self.name(cookie),
            self.attributes(COOKIE_TTL_SECS)
        );
        let value = HeaderValue::from_str(&header)
            .map_err(|e| RelayError::Configuration(format!("Invalid cookie header: {e}")))?;
        Ok((SET_COOKIE, value))
    }

    /// A `Set-Cookie` header deleting the cookie.
    pub fn expire(&self, cookie: SessionCookie) -> Result<(HeaderName, HeaderValue)> {
        let header = format!("{}=; {}", self.name(cookie), self.attributes(0));
        let value = HeaderValue::from_str(&header)
            .map_err(|e| RelayError::Configuration(format!("Invalid cookie header: {e}")))?;
        Ok((SET_COOKIE, value))
    }

    /// Reads and verifies a cookie from the request headers.
    pub fn read(&self, headers: &HeaderMap, cookie: SessionCookie) -> Option<String> {
        let name = self.name(cookie);
        let token = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, token)| token)?;
        self.verify(&name, token)
    }

    fn verify(&self, name: &str, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<CookieClaims>(token, &self.decoding, &validation) {
            Ok(data) if data.claims.name == name => Some(data.claims.value),
            Ok(_) => {
                debug!("Cookie {name} carries a token issued for another cookie");
                None
            }
            Err(e) => {
                debug!("Cookie {name} rejected: {e}");
                None
            }
        }
    }
}
