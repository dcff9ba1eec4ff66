#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use goodfriends_api::auth;
use goodfriends_api::config::AppConfig;
use goodfriends_api::services::memory::InMemoryStore;
use goodfriends_api::{app, AppState};

const APPSETTINGS: &str = r#"{
    "ConnectionStrings": {
        "DemoConnection": "Server=localdb;Database=friends;"
    },
    "DbSetActiveIdx": 0,
    "DbSets": [
        {
            "DbLocation": "Local",
            "DbServer": "Demo",
            "DbLogins": [
                { "DbUserLogin": "gstusr", "DbConnection": "DemoConnection" },
                { "DbUserLogin": "usr", "DbConnection": "DemoConnection" },
                { "DbUserLogin": "supusr", "DbConnection": "DemoConnection" }
            ]
        }
    ],
    "PasswordSaltDetails": { "Salt": "test-salt", "Iterations": 100 },
    "JwtConfig": {
        "LifeTimeMinutes": 60,
        "ValidateIssuerSigningKey": true,
        "IssuerSigningKey": "a-test-signing-key-of-decent-length",
        "ValidateIssuer": true,
        "ValidIssuer": "goodfriends",
        "ValidateAudience": true,
        "ValidAudience": "goodfriends-clients",
        "RequireExpirationTime": true,
        "ValidateLifetime": true
    }
}"#;

/// Build the real router in-process against a config loaded through the real
/// file path, backed by a fresh in-memory store.
pub fn test_app() -> (Router, AppState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("appsettings.json");
    std::fs::write(&path, APPSETTINGS).expect("write appsettings");

    let config = Arc::new(AppConfig::load(None, &path).expect("config loads"));
    let store = Arc::new(InMemoryStore::bootstrap(config.clone()));
    let state = AppState {
        config,
        friends: store.clone(),
        logins: store,
    };
    (app(state.clone()), state)
}

/// Issue a token directly, bypassing the login endpoint.
pub fn token_for(state: &AppState, user_name: &str, role: &str) -> String {
    auth::encode_token(
        state.config.jwt(),
        Uuid::new_v4(),
        user_name,
        vec![role.to_string()],
    )
    .expect("token encodes")
}

pub fn request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

pub async fn send(
    app: &Router,
    req: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let res = app.clone().oneshot(req).await.expect("request handled");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, value)
}

pub async fn get(app: &Router, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    send(app, request("GET", path, token, None)).await
}
