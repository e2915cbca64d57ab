//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    Router,
};
use bank_api::auth::{PasswordHasher, TokenService};
use bank_api::config::JwtSecret;
use bank_api::store::{AccountDirectory, InMemoryDirectory};
use bank_api::{api, AppState};
use serde_json::Value;
use tower::util::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Application wired to a fresh in-memory directory
pub struct TestApp {
    pub router: Router,
    pub directory: Arc<InMemoryDirectory>,
    pub state: AppState,
}

pub fn setup_test_app() -> TestApp {
    let directory = Arc::new(InMemoryDirectory::new());
    let dyn_directory: Arc<dyn AccountDirectory> = directory.clone();
    let state = AppState::new(
        dyn_directory,
        TokenService::new(
            &JwtSecret::new(TEST_SECRET.to_vec()).unwrap(),
            Duration::from_secs(15000),
        ),
        // Lowest bcrypt cost keeps the suite fast
        PasswordHasher::new(4),
        Duration::from_secs(1),
    );

    TestApp {
        router: api::build_router(state.clone()),
        directory,
        state,
    }
}

impl TestApp {
    /// Send a request and return status plus parsed JSON body (Null when empty or not JSON)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Create an account and return the JSON the API answered with
    pub async fn create_account(&self, first: &str, last: &str, password: &str) -> Value {
        let (status, json) = self
            .post_json(
                "/account",
                serde_json::json!({
                    "firstName": first,
                    "lastName": last,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "account creation failed: {}", json);
        json
    }

    /// Log in and return the token
    pub async fn login(&self, number: i64, password: &str) -> String {
        let (status, json) = self
            .post_json(
                "/login",
                serde_json::json!({ "number": number, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", json);
        json["token"].as_str().unwrap().to_string()
    }

    pub async fn account_request(
        &self,
        method: &str,
        id: impl std::fmt::Display,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/account/{}", id));
        if let Some(token) = token {
            builder = builder.header("x-jwt-token", token);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}
