mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use dayflow_relay::{
    cookies::{CookieSigner, SessionCookie, COOKIE_TTL_SECS},
    pkce::challenge_for,
};
use serde_json::json;
use wiremock::{
    matchers::{body_string_contains, header as header_is, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use common::{
    cookie_header, json_body, location, query_value, send, set_cookies, test_app, COOKIE_SECRET,
};

const BROKER_CALLBACK: &str = "https://broker.example.com/v1/oauth_callback";

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn token_request(
    method: Method,
    content_type: &str,
    body: &str,
    cookie: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/token")
        .header(header::CONTENT_TYPE, content_type);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn authorize_uri(extra: &str) -> String {
    format!("/authorize?client_id=ignored&redirect_uri={BROKER_CALLBACK}{extra}")
}

#[tokio::test]
async fn test_authorize_without_challenge_generates_verifier() {
    let app = test_app("https://provider.example.com");
    let response = send(&app, get(&authorize_uri("&state=abc123"), None)).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = location(&response);
    assert_eq!(target.path(), "/v4/permission");
    assert_eq!(query_value(&target, "app_id").as_deref(), Some("test-app"));
    assert_eq!(
        query_value(&target, "redirect_uri").as_deref(),
        Some("https://relay.example.com/callback")
    );
    assert_eq!(query_value(&target, "code_challenge_method").as_deref(), Some("S256"));
    assert_eq!(query_value(&target, "state").as_deref(), Some("abc123"));
    assert_eq!(query_value(&target, "code_challenge").map(|c| c.len()), Some(43));

    let cookies = set_cookies(&response);
    let names: Vec<_> = cookies
        .iter()
        .filter_map(|c| c.split('=').next())
        .collect();
    assert_eq!(names, ["zalo_code_verifier", "zalo_redirect_uri", "zalo_state"]);
    assert!(cookies
        .iter()
        .all(|c| c.ends_with("HttpOnly; SameSite=Lax; Path=/; Max-Age=600")));
}

#[tokio::test]
async fn test_authorize_with_challenge_sets_no_verifier() {
    let app = test_app("https://provider.example.com");
    let response = send(
        &app,
        get(&authorize_uri("&code_challenge=brokerchallenge&code_challenge_method=plain"), None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = location(&response);
    assert_eq!(query_value(&target, "code_challenge").as_deref(), Some("brokerchallenge"));
    assert_eq!(query_value(&target, "code_challenge_method").as_deref(), Some("plain"));
    assert_eq!(query_value(&target, "state"), None);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("zalo_redirect_uri="));
}

#[tokio::test]
async fn test_authorize_requires_redirect_uri() {
    let app = test_app("https://provider.example.com");
    let response = send(&app, get("/authorize?state=abc", None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_callback_forwards_matching_state_only() {
    let app = test_app("https://provider.example.com");
    let authorized = send(&app, get(&authorize_uri("&state=abc123"), None)).await;
    let cookie = cookie_header(&set_cookies(&authorized));

    let response = send(&app, get("/callback?code=xyz&state=abc123", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = location(&response);
    assert!(target.as_str().starts_with(BROKER_CALLBACK));
    assert_eq!(query_value(&target, "code").as_deref(), Some("xyz"));
    assert_eq!(query_value(&target, "state").as_deref(), Some("abc123"));

    let cleared = set_cookies(&response);
    assert!(cleared.iter().any(|c| c.starts_with("zalo_redirect_uri=;")));
    assert!(cleared.iter().any(|c| c.starts_with("zalo_state=;")));
    assert!(!cleared.iter().any(|c| c.starts_with("zalo_code_verifier")));

    let response = send(&app, get("/callback?code=xyz&state=wrong", Some(&cookie))).await;
    let target = location(&response);
    assert_eq!(query_value(&target, "code").as_deref(), Some("xyz"));
    assert_eq!(query_value(&target, "state"), None);
}

#[tokio::test]
async fn test_callback_errors() {
    let app = test_app("https://provider.example.com");

    let response = send(
        &app,
        get("/callback?error=access_denied&error_description=User%20cancelled", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "access_denied", "error_description": "User cancelled" })
    );

    let response = send(&app, get("/callback?state=abc", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid_request");

    let response = send(&app, get("/callback?code=xyz", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error_description"],
        "Session expired or invalid request"
    );
}

#[tokio::test]
async fn test_expired_or_forged_cookie_is_missing() {
    let app = test_app("https://provider.example.com");
    let now = jiff::Timestamp::now().as_second();

    let signer = CookieSigner::new(COOKIE_SECRET.as_bytes(), "zalo", false);
    let stale = signer
        .sign(SessionCookie::RedirectUri, BROKER_CALLBACK, now - COOKIE_TTL_SECS - 5)
        .unwrap();
    let response = send(
        &app,
        get("/callback?code=xyz", Some(&format!("zalo_redirect_uri={stale}"))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let forger = CookieSigner::new(b"this-is-not-the-relay-secret-key", "zalo", false);
    let forged = forger.sign(SessionCookie::RedirectUri, "https://evil.example.com", now).unwrap();
    let response = send(
        &app,
        get("/callback?code=xyz", Some(&format!("zalo_redirect_uri={forged}"))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_flow_exchanges_generated_verifier() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/access_token"))
        .and(header_is("secret_key", "test-secret"))
        .and(body_string_contains("app_id=test-app"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": "3600"
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let app = test_app(&provider.uri());
    let authorized = send(&app, get(&authorize_uri(""), None)).await;
    let challenge = query_value(&location(&authorized), "code_challenge").unwrap();
    let cookie = cookie_header(&set_cookies(&authorized));

    let response = send(
        &app,
        token_request(Method::POST, "application/x-www-form-urlencoded", "code=xyz", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("zalo_code_verifier=;")));
    assert_eq!(
        json_body(response).await,
        json!({
            "access_token": "access-1",
            "token_type": "Bearer",
            "expires_in": "3600",
            "refresh_token": "refresh-1"
        })
    );

    // The verifier sent upstream matches the challenge given to the provider.
    let requests = provider.received_requests().await.unwrap();
    let verifier = url::form_urlencoded::parse(&requests[0].body)
        .find(|(k, _)| k == "code_verifier")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(challenge_for(&verifier), challenge);
}

#[tokio::test]
async fn test_token_accepts_verifier_in_json_body() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/access_token"))
        .and(body_string_contains("code_verifier=broker-verifier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let app = test_app(&provider.uri());
    let response = send(
        &app,
        token_request(
            Method::POST,
            "application/json",
            r#"{"code":"xyz","code_verifier":"broker-verifier","client_id":"ignored"}"#,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["access_token"], "access-2");
}

#[tokio::test]
async fn test_token_validation_errors() {
    let app = test_app("https://provider.example.com");

    for (content_type, body) in [
        ("application/json", "{}"),
        ("application/x-www-form-urlencoded", "grant_type=authorization_code"),
    ] {
        let response = send(&app, token_request(Method::POST, content_type, body, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{content_type}");
        let body = json_body(response).await;
        assert_eq!(body["error"], "invalid_request", "{content_type}");
        assert_eq!(body["error_description"], "Missing required parameter: code");
    }

    let response = send(
        &app,
        token_request(Method::POST, "application/json", r#"{"code":"xyz"}"#, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["error_description"]
        .as_str()
        .unwrap()
        .starts_with("Code verifier not found"));
}

#[tokio::test]
async fn test_token_errors_pass_through() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("code=expired"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Authorization code expired"
        })))
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("code=mismatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": -14019,
            "message": "Invalid code verifier"
        })))
        .mount(&provider)
        .await;

    let app = test_app(&provider.uri());

    let response = send(
        &app,
        token_request(
            Method::POST,
            "application/json",
            r#"{"code":"expired","code_verifier":"v"}"#,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "invalid_grant", "error_description": "Authorization code expired" })
    );

    let response = send(
        &app,
        token_request(
            Method::POST,
            "application/json",
            r#"{"code":"mismatch","code_verifier":"v"}"#,
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "-14019", "error_description": "Invalid code verifier" })
    );
}

#[tokio::test]
async fn test_refresh_via_put_and_post() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/access_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-3",
            "refresh_token": "refresh-2",
            "expires_in": "3600"
        })))
        .expect(2)
        .mount(&provider)
        .await;

    let app = test_app(&provider.uri());

    let response = send(
        &app,
        token_request(Method::PUT, "application/json", r#"{"refresh_token":"refresh-1"}"#, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["refresh_token"], "refresh-2");

    let response = send(
        &app,
        token_request(
            Method::POST,
            "application/x-www-form-urlencoded",
            "grant_type=refresh_token&refresh_token=refresh-1",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, token_request(Method::PUT, "application/json", "{}", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_userinfo_maps_profile() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/me"))
        .and(query_param("fields", "id,name,picture"))
        .and(header_is("access_token", "access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "8400",
            "name": "Nguyen Van A",
            "picture": { "data": { "url": "https://cdn.example.com/a.jpg" } }
        })))
        .mount(&provider)
        .await;

    let app = test_app(&provider.uri());

    let response = send(&app, get("/userinfo", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/userinfo")
        .header(header::AUTHORIZATION, "Bearer access-1")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sub"], "8400");
    assert_eq!(body["given_name"], "Nguyen Van A");
    assert_eq!(body["family_name"], "");
    assert_eq!(body["avatar_url"], "https://cdn.example.com/a.jpg");
    assert_eq!(body["email_verified"], false);
    assert_eq!(body["locale"], "vi");
}
