//! Integration tests: health, register/login/logout/refresh lifecycle.
//!
//! Run with `cargo test`. Tests that need a database are skipped unless
//! `TEST_DATABASE_URL` points at a Postgres with migrations applied
//! (`psql "$TEST_DATABASE_URL" -f migrations/001_init.sql`).

use authd::auth::{ArgonScheme, BasicPolicy, TokenIssuer};
use authd::{create_app, db, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn test_state(database_url: &str) -> Result<AppState, Box<dyn std::error::Error>> {
    let db_pool = db::create_pool(database_url).await?;
    let issuer = TokenIssuer::new("test-jwt-secret-min-32-chars!!!!".to_string(), 900, 86400);
    let scheme = Arc::new(ArgonScheme::new()?);
    let policy = Arc::new(BasicPolicy::default());
    Ok(AppState {
        db: db_pool,
        issuer,
        scheme,
        policy,
    })
}

async fn test_app() -> Option<axum::Router> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Skip integration test: set TEST_DATABASE_URL");
            return None;
        }
    };
    match test_state(&database_url).await {
        Ok(state) => Some(create_app(state)),
        Err(e) => {
            eprintln!("Skip integration test: {}", e);
            None
        }
    }
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn unique_email() -> String {
    format!("test-{}@example.com", uuid::Uuid::new_v4().simple())
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let Some(app) = test_app().await else { return };
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("ok"));
}

#[tokio::test]
async fn register_login_logout_lifecycle() {
    let Some(app) = test_app().await else { return };

    let email = unique_email();
    let username = format!("user-{}", uuid::Uuid::new_v4().simple());
    let register = serde_json::json!({
        "email": email,
        "username": username,
        "password": "Str0ngPass!",
        "confirmPassword": "Str0ngPass!",
    });
    let res = app.clone().oneshot(post_json("/api/register/", &register)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED, "register should return 201");
    let json = body_json(res).await;
    let registered_refresh = json["tokens"]["refresh"].as_str().unwrap().to_string();
    assert!(json["tokens"]["access"].as_str().is_some());
    assert_eq!(json["user"]["email"].as_str(), Some(email.as_str()));
    assert!(json["user"].get("password_hash").is_none());

    let login = serde_json::json!({ "email": email, "password": "Str0ngPass!" });
    let res = app.clone().oneshot(post_json("/api/login/", &login)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK, "login should succeed");
    let json = body_json(res).await;
    let access = json["tokens"]["access"].as_str().unwrap().to_string();
    let refresh = json["tokens"]["refresh"].as_str().unwrap().to_string();
    assert_ne!(refresh, registered_refresh, "login mints a distinct pair");

    // refresh mints a new access token while the refresh token is live
    let res = app
        .clone()
        .oneshot(post_json("/api/token/refresh/", &serde_json::json!({ "refresh": refresh })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json = body_json(res).await;
    assert!(json.get("access").and_then(|v| v.as_str()).is_some());

    let logout = |refresh: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/logout/")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", access))
            .body(Body::from(serde_json::json!({ "refresh": refresh }).to_string()))
            .unwrap()
    };

    let res = app.clone().oneshot(logout(&refresh)).await.unwrap();
    assert_eq!(res.status(), StatusCode::RESET_CONTENT, "logout should return 205");

    // the revoked refresh token can never mint an access token again
    let res = app
        .clone()
        .oneshot(post_json("/api/token/refresh/", &serde_json::json!({ "refresh": refresh })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // a second logout with the same refresh token observes InvalidToken
    let res = app.clone().oneshot(logout(&refresh)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn duplicate_email_is_field_scoped() {
    let Some(app) = test_app().await else { return };

    let email = unique_email();
    let register = |username: String| {
        serde_json::json!({
            "email": email,
            "username": username,
            "password": "Str0ngPass!",
            "confirmPassword": "Str0ngPass!",
        })
    };

    let res = app
        .clone()
        .oneshot(post_json("/api/register/", &register(format!("u-{}", uuid::Uuid::new_v4().simple()))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .clone()
        .oneshot(post_json("/api/register/", &register(format!("u-{}", uuid::Uuid::new_v4().simple()))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert!(json.get("email").is_some(), "duplicate error names the field");
}

#[tokio::test]
async fn registration_errors_name_fields() {
    let Some(app) = test_app().await else { return };

    let body = serde_json::json!({
        "email": unique_email(),
        "username": "someone",
        "password": "abc",
        "confirmPassword": "xyz",
    });
    let res = app.clone().oneshot(post_json("/api/register/", &body)).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert_eq!(
        json.get("confirmPassword").and_then(|v| v.as_str()),
        Some("Passwords do not match")
    );
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let Some(app) = test_app().await else { return };

    let email = unique_email();
    let register = serde_json::json!({
        "email": email,
        "username": format!("u-{}", uuid::Uuid::new_v4().simple()),
        "password": "Str0ngPass!",
        "confirmPassword": "Str0ngPass!",
    });
    let res = app.clone().oneshot(post_json("/api/register/", &register)).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let wrong_password = serde_json::json!({ "email": email, "password": "WrongPass!9" });
    let res1 = app.clone().oneshot(post_json("/api/login/", &wrong_password)).await.unwrap();
    assert_eq!(res1.status(), StatusCode::UNAUTHORIZED);
    let body1 = body_json(res1).await;

    let unknown_email = serde_json::json!({ "email": unique_email(), "password": "WrongPass!9" });
    let res2 = app.clone().oneshot(post_json("/api/login/", &unknown_email)).await.unwrap();
    assert_eq!(res2.status(), StatusCode::UNAUTHORIZED);
    let body2 = body_json(res2).await;

    assert_eq!(body1, body2, "login failures must share one generic body");
    assert_eq!(body1.get("error").and_then(|v| v.as_str()), Some("Invalid credentials"));
}

#[tokio::test]
async fn logout_requires_authentication() {
    let Some(app) = test_app().await else { return };

    let res = app
        .clone()
        .oneshot(post_json("/api/logout/", &serde_json::json!({ "refresh": "whatever" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
