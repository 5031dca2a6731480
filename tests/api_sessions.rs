#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use std::sync::Arc;
use tessera::{
    api::{self, AuthConfig, AuthState},
    auth::{AuthType, ExemptPaths},
    users::UserStore,
};
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

fn app(config: AuthConfig) -> Router {
    api::router(Arc::new(AuthState::in_memory(config, UserStore::memory())))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn form(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_cookie(method: Method, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` part of the response's `Set-Cookie` header.
fn session_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

async fn register(app: &Router, email: &str, password: &str) -> Response {
    send(
        app,
        form(
            Method::POST,
            "/api/v1/users",
            &format!("email={email}&password={password}"),
        ),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> Response {
    send(
        app,
        form(
            Method::POST,
            "/api/v1/sessions",
            &format!("email={email}&password={password}"),
        ),
    )
    .await
}

#[tokio::test]
async fn session_lifecycle() {
    let app = app(AuthConfig::default());

    let response = register(&app, "alice@example.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered = json(response).await;
    assert_eq!(registered["email"], "alice@example.com");
    assert!(registered.get("password_hash").is_none());

    let response = login(&app, "alice@example.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("_my_session_id="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(!set_cookie.contains("Secure"));
    let cookie = session_cookie(&response);
    assert_eq!(json(response).await["id"], registered["id"]);

    let response = send(&app, with_cookie(Method::GET, "/api/v1/users/me", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["email"], "alice@example.com");

    let response = send(&app, with_cookie(Method::DELETE, "/api/v1/sessions", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));
    assert_eq!(json(response).await, serde_json::json!({}));

    let response = send(&app, with_cookie(Method::GET, "/api/v1/users/me", &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, with_cookie(Method::DELETE, "/api/v1/sessions", &cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_failures() {
    let app = app(AuthConfig::default());
    register(&app, "alice@example.com", "pw1").await;

    let response = login(&app, "alice@example.com", "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());

    let response = login(&app, "bob@example.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, form(Method::POST, "/api/v1/sessions", "password=pw1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "email missing");

    let response = send(
        &app,
        form(Method::POST, "/api/v1/sessions", "email=alice@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(response).await["error"], "password missing");
}

#[tokio::test]
async fn register_conflict_and_validation() {
    let app = app(AuthConfig::default());

    assert_eq!(
        register(&app, "alice@example.com", "pw1").await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register(&app, "ALICE@example.com", "pw2").await.status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        register(&app, "alice", "pw1").await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        register(&app, "%20%20", "pw1").await.status(),
        StatusCode::BAD_REQUEST
    );
    let response = send(&app, form(Method::POST, "/api/v1/users", "")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn guard_distinguishes_missing_and_bad_credentials() {
    let app = app(AuthConfig::default());

    let response = send(&app, get("/api/v1/users/me")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        with_cookie(Method::GET, "/api/v1/users/me", "_my_session_id=bogus"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        with_cookie(Method::GET, "/api/v1/users/me", "other_cookie=1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn exempt_paths_skip_the_guard() {
    let app = app(AuthConfig::default());

    for path in ["/api/v1/status", "/api/v1/status/"] {
        let response = send(&app, get(path)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(json(response).await["status"], "OK");
    }

    let response = send(&app, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("X-App").is_some());
    assert!(response.headers().get("x-request-id").is_some());

    let response = send(&app, get("/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json(response).await["paths"]
        .get("/api/v1/sessions")
        .is_some());
}

#[tokio::test]
async fn empty_exemptions_guard_everything() {
    let config = AuthConfig::default().with_exempt_paths(ExemptPaths::default());
    let app = app(config);

    let response = send(&app, get("/api/v1/status/")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = register(&app, "alice@example.com", "pw1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn basic_auth_strategy() {
    let app = app(AuthConfig::new(AuthType::Basic));
    register(&app, "alice@example.com", "pw1").await;

    let basic = |pair: &str| {
        Request::builder()
            .uri("/api/v1/users/me")
            .header(AUTHORIZATION, format!("Basic {}", STANDARD.encode(pair)))
            .body(Body::empty())
            .unwrap()
    };

    let response = send(&app, basic("alice@example.com:pw1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["email"], "alice@example.com");

    let response = send(&app, basic("alice@example.com:wrong")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, basic("no-colon")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, get("/api/v1/users/me")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_rotates_credentials() {
    let app = app(AuthConfig::default());
    register(&app, "alice@example.com", "old").await;
    let cookie = session_cookie(&login(&app, "alice@example.com", "old").await);

    let mut request = form(Method::PUT, "/api/v1/users/me/password", "password=new");
    request
        .headers_mut()
        .insert(COOKIE, cookie.parse().unwrap());
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        login(&app, "alice@example.com", "old").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&app, "alice@example.com", "new").await.status(),
        StatusCode::CREATED
    );

    let response = send(
        &app,
        form(Method::PUT, "/api/v1/users/me/password", "password=x"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn custom_session_name_and_secure_cookie() {
    let config = AuthConfig::default()
        .with_session_name("sid".to_string())
        .with_session_cookie_secure(true);
    let app = app(config);
    register(&app, "alice@example.com", "pw1").await;

    let response = login(&app, "alice@example.com", "pw1").await;
    let header = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(header.starts_with("sid="));
    assert!(header.ends_with("; Secure"));

    let cookie = session_cookie(&response);
    let response = send(&app, with_cookie(Method::GET, "/api/v1/users/me", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let renamed = cookie.replacen("sid=", "_my_session_id=", 1);
    let response = send(&app, with_cookie(Method::GET, "/api/v1/users/me", &renamed)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
