#![allow(dead_code)]

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;
use todoapp::auth::{MockClock, TokenAuthority};
use todoapp::configuration::{JwtSettings, PasswordSettings};
use todoapp::startup::{run, AppState};
use todoapp::store::InMemoryStore;
use todoapp::telemetry::try_init_telemetry;

pub const TEST_SECRET: &str = "test-secret-key-that-is-long-enough-for-hs256";
pub const TOKEN_TTL_SECONDS: i64 = 1200;

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MockClock>,
    pub authority: Arc<TokenAuthority>,
    pub client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    try_init_telemetry();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MockClock::new(Utc::now()));
    let jwt = JwtSettings {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: TOKEN_TTL_SECONDS,
    };
    let authority = Arc::new(TokenAuthority::new(&jwt, clock.clone()));

    let state = AppState::new(
        store.clone(),
        store.clone(),
        authority.clone(),
        PasswordSettings { hash_cost: 4 },
        "static",
    );
    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        clock,
        authority,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/auth/new-user"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register an active user and return their id
    pub async fn create_user(&self, username: &str, password: &str, role: &str) -> i64 {
        let response = self
            .register(&json!({
                "email": format!("{}@example.com", username),
                "username": username,
                "first_name": "Test",
                "last_name": "User",
                "password": password,
                "role": role,
            }))
            .await;
        assert_eq!(201, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        body["user_id"].as_i64().unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_json(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_todo(&self, token: &str, title: &str) -> Value {
        let response = self
            .post_json(
                "/todos",
                token,
                &json!({ "title": title, "description": "some description", "priority": 3 }),
            )
            .await;
        assert_eq!(201, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        body["todo"].clone()
    }

    pub fn advance_clock(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }
}
