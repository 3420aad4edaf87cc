//! Request handlers for the authorize, callback, token and userinfo routes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    cookies::SessionCookie,
    error::{RelayError, Result},
    pkce::PkcePair,
    provider::{TokenResponse, UserInfo},
    state::RelayState,
};

const DEFAULT_CHALLENGE_METHOD: &str = "S256";
const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";
const REFRESH_TOKEN_GRANT: &str = "refresh_token";

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorizeQuery {
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
}

/// `GET /authorize`: stores the broker's redirect target and forwards the
/// user to the provider's consent page.
pub async fn authorize(
    State(state): State<Arc<RelayState>>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Response> {
    let redirect_uri = present(query.redirect_uri).ok_or_else(|| {
        RelayError::InvalidRequest("Missing required parameter: redirect_uri".to_string())
    })?;
    let oauth_state = present(query.state);
    let mut cookies = Vec::new();

    let code_challenge = if let Some(challenge) = present(query.code_challenge) {
        debug!("Using the broker's PKCE challenge");
        challenge
    } else {
        let pair = PkcePair::generate();
        cookies.push(state.cookies.issue(SessionCookie::CodeVerifier, &pair.verifier)?);
        pair.challenge
    };
    let method = present(query.code_challenge_method)
        .unwrap_or_else(|| DEFAULT_CHALLENGE_METHOD.to_string());

    cookies.push(state.cookies.issue(SessionCookie::RedirectUri, &redirect_uri)?);
    if let Some(value) = &oauth_state {
        cookies.push(state.cookies.issue(SessionCookie::State, value)?);
    }

    let callback_url = state.config.callback_url();
    let mut params = vec![
        ("app_id", state.config.app_id.as_str()),
        ("redirect_uri", callback_url.as_str()),
        ("code_challenge", code_challenge.as_str()),
        ("code_challenge_method", method.as_str()),
    ];
    if let Some(value) = &oauth_state {
        params.push(("state", value.as_str()));
    }
    let target = Url::parse_with_params(&state.config.authorize_url, &params)
        .map_err(|e| RelayError::Configuration(format!("Invalid authorize URL: {e}")))?;

    info!("Redirecting to provider authorization");
    Ok((AppendHeaders(cookies), Redirect::temporary(target.as_str())).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /callback`: hands the provider's code back to the broker.
pub async fn callback(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    if let Some(error) = present(query.error) {
        return Err(RelayError::Provider {
            status: StatusCode::BAD_REQUEST,
            error,
            description: query.error_description.unwrap_or_default(),
        });
    }

    let code = present(query.code).ok_or_else(|| {
        RelayError::InvalidRequest("Authorization code not received from provider".to_string())
    })?;
    let redirect_uri = state
        .cookies
        .read(&headers, SessionCookie::RedirectUri)
        .ok_or_else(|| {
            RelayError::InvalidRequest("Session expired or invalid request".to_string())
        })?;
    let stored_state = state.cookies.read(&headers, SessionCookie::State);

    let mut target = Url::parse(&redirect_uri)
        .map_err(|e| RelayError::InvalidRequest(format!("Stored redirect_uri is invalid: {e}")))?;
    {
        let mut pairs = target.query_pairs_mut();
        pairs.append_pair("code", &code);
        match (&query.state, &stored_state) {
            (Some(returned), Some(stored)) if returned == stored => {
                pairs.append_pair("state", returned);
            }
            (Some(_), _) => debug!("Dropping state that does not match the session"),
            _ => {}
        }
    }

    // The verifier cookie stays for the token exchange.
    let cookies = [
        state.cookies.expire(SessionCookie::RedirectUri)?,
        state.cookies.expire(SessionCookie::State)?,
    ];
    info!("Returning authorization code to broker");
    Ok((AppendHeaders(cookies), Redirect::temporary(target.as_str())).into_response())
}

/// Body of `POST /token` and `PUT /token`.
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub grant_type: Option<String>,
    pub redirect_uri: Option<String>,
    pub refresh_token: Option<String>,
}

/// Parses form bodies when the content type says so, JSON otherwise.
fn parse_token_request(headers: &HeaderMap, body: &Bytes) -> Result<TokenRequest> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.contains("application/x-www-form-urlencoded") {
        let fields: Map<String, Value> = url::form_urlencoded::parse(body)
            .into_owned()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        return serde_json::from_value(Value::Object(fields))
            .map_err(|e| RelayError::InvalidRequest(format!("Malformed form body: {e}")));
    }

    serde_json::from_slice(body)
        .map_err(|e| RelayError::InvalidRequest(format!("Malformed JSON body: {e}")))
}

async fn refresh_with(state: &RelayState, request: TokenRequest) -> Result<Json<TokenResponse>> {
    let refresh_token = present(request.refresh_token).ok_or_else(|| {
        RelayError::InvalidRequest("Missing required parameter: refresh_token".to_string())
    })?;
    let grant_type =
        present(request.grant_type).unwrap_or_else(|| REFRESH_TOKEN_GRANT.to_string());
    let token = state.provider.refresh(&refresh_token, &grant_type).await?;
    info!("Token refresh succeeded");
    Ok(Json(token))
}

/// `POST /token`: exchanges the code and PKCE verifier for tokens.
pub async fn token(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let request = parse_token_request(&headers, &body)?;
    if request.grant_type.as_deref() == Some(REFRESH_TOKEN_GRANT) {
        return refresh_with(&state, request)
            .await
            .map(IntoResponse::into_response);
    }

    let code = present(request.code).ok_or_else(|| {
        RelayError::InvalidRequest("Missing required parameter: code".to_string())
    })?;
    let verifier = present(request.code_verifier)
        .or_else(|| state.cookies.read(&headers, SessionCookie::CodeVerifier))
        .ok_or_else(|| {
            RelayError::InvalidRequest(
                "Code verifier not found. Please restart the authentication flow.".to_string(),
            )
        })?;
    let grant_type =
        present(request.grant_type).unwrap_or_else(|| AUTHORIZATION_CODE_GRANT.to_string());

    let token = state
        .provider
        .exchange_code(&code, &verifier, &grant_type)
        .await?;
    info!("Token exchange succeeded");

    let cleared = [state.cookies.expire(SessionCookie::CodeVerifier)?];
    Ok((AppendHeaders(cleared), Json(token)).into_response())
}

/// `PUT /token`: refresh-token grant.
pub async fn refresh(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenResponse>> {
    let request = parse_token_request(&headers, &body)?;
    refresh_with(&state, request).await
}

/// `GET /userinfo`: profile claims for a bearer token.
pub async fn userinfo(
    State(state): State<Arc<RelayState>>,
    headers: HeaderMap,
) -> Result<Json<UserInfo>> {
    let access_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            RelayError::Unauthorized("Missing or invalid authorization header".to_string())
        })?;

    let info = state.provider.user_info(access_token).await?;
    Ok(Json(info))
}
