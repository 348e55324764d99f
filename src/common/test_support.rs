//! Shared fixtures for module tests: an in-memory database and signed tokens

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tower::ServiceExt;

use super::dev_mode::DevModeConfig;
use super::migrations::run_migrations;
use super::AppState;
use crate::auth::models::Claims;

pub const TEST_SECRET: &str = "test_secret_key";

/// In-memory SQLite with the production schema. A single connection keeps
/// every query on the same in-memory database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool, false).await.unwrap();
    pool
}

pub fn test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState {
        db: pool,
        jwt_secret: TEST_SECRET.to_string(),
        dev_mode: DevModeConfig::disabled(),
    })
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = setup_test_db().await;
    let app = crate::app::build_router(test_state(pool.clone()), &[]);
    (app, pool)
}

pub fn bearer_token(principal_id: &str) -> String {
    let claims = Claims {
        sub: principal_id.to_string(),
        exp: 9999999999,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

/// Marks the user behind `principal_id` as premium, creating the user if needed
pub async fn make_premium(pool: &SqlitePool, principal_id: &str) {
    let user = crate::auth::services::resolve_principal(pool, principal_id)
        .await
        .unwrap();
    sqlx::query("INSERT INTO subscriptions (user_id, active, current_period_end) VALUES (?, 1, NULL)")
        .bind(&user.id)
        .execute(pool)
        .await
        .unwrap();
}

/// Sends a request through the router and returns the status and JSON body
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    principal_id: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send_raw(
        app,
        method,
        uri,
        principal_id,
        body.map(|b| ("application/json", b.to_string())),
    )
    .await;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Sends a request with an arbitrary body and returns the status and raw body
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    principal_id: Option<&str>,
    body: Option<(&str, String)>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(principal_id) = principal_id {
        builder = builder.header(header::AUTHORIZATION, bearer_token(principal_id));
    }
    let request = match body {
        Some((content_type, payload)) => builder
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(payload))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}
