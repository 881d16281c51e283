//! Shared harness for the router tests
//!
//! Each `#[sqlx::test]` hands us a fresh, migrated database; the context
//! loads the demo dataset into it and drives the router with `oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use breadvan_api::{
    app::{build_router, AppState},
    config::Config,
};
use breadvan_shared::{schedule, services::seed};
use chrono::Duration;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "router-test-secret-at-least-32-bytes!";

pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgresql://unused".to_string()),
        "JWT_SECRET" => Some(JWT_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

impl TestContext {
    /// Router over the demo dataset (admin, bob, mary, alice, jane, john)
    pub async fn seeded(db: PgPool) -> Self {
        seed::initialize(&db).await.unwrap();
        Self::empty(db)
    }

    pub fn empty(db: PgPool) -> Self {
        let app = build_router(AppState::new(db.clone(), test_config()));
        Self { db, app }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a JSON request and returns the status and parsed body
    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// Logs in through the API and returns the access token
    pub async fn token(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                "POST",
                "/v1/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Posts an urlencoded form with the session cookie
    pub async fn form(&self, uri: &str, token: Option<&str>, body: &str) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("access_token={}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// GETs a page with the session cookie
    pub async fn page(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("access_token={}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Id of mary's seeded drive to Warner Street
    pub async fn seeded_drive_id(&self, mary: &str) -> i64 {
        let (_, body) = self.json("GET", "/v1/driver/drives", Some(mary), None).await;
        body["items"][0]["id"].as_i64().unwrap()
    }
}

pub async fn text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

/// `YYYY-MM-DD` for a day relative to today
pub fn day(offset: i64) -> String {
    (schedule::local_now().date() + Duration::days(offset))
        .format(schedule::DATE_FORMAT)
        .to_string()
}
