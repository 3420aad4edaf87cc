#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::SET_COOKIE, Request, Response},
    Router,
};
use dayflow_relay::{router, RelayConfig, RelayState};
use serde_json::Value;
use tower::ServiceExt;

pub const COOKIE_SECRET: &str = "0123456789abcdef0123456789abcdef";

/// Relay configuration whose provider endpoints live on `provider_url`.
pub fn test_config(provider_url: &str) -> RelayConfig {
    RelayConfig {
        app_id: "test-app".to_string(),
        secret_key: "test-secret".to_string(),
        cookie_secret: COOKIE_SECRET.to_string(),
        public_url: "https://relay.example.com".to_string(),
        cookie_prefix: "zalo".to_string(),
        secure_cookies: false,
        authorize_url: format!("{provider_url}/v4/permission"),
        token_url: format!("{provider_url}/v4/access_token"),
        userinfo_url: format!("{provider_url}/v2.0/me"),
    }
}

pub fn test_app(provider_url: &str) -> Router {
    router(RelayState::new(test_config(provider_url)).expect("Failed to build relay state"))
}

/// Runs one request through the router in-process.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("Router call failed")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// `Set-Cookie` headers of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("non-ASCII cookie").to_string())
        .collect()
}

/// Builds a `Cookie` request header from the non-empty `Set-Cookie` values.
pub fn cookie_header(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .filter_map(|c| c.split(';').next())
        .filter(|pair| !pair.ends_with('='))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn location(response: &Response<Body>) -> url::Url {
    let raw = response
        .headers()
        .get("location")
        .expect("missing Location header")
        .to_str()
        .unwrap();
    url::Url::parse(raw).expect("Location is not a URL")
}

pub fn query_value(url: &url::Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
