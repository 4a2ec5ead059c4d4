#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use sampletrack_api::{
    auth::{AuthVerifier, Claims, Role},
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    ids::{SequenceIdGenerator, SharedIdGenerator},
    AppState,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";

/// Helper harness spinning up the full router backed by an in-memory SQLite
/// database. A single pooled connection keeps the in-memory database alive
/// for the lifetime of the test.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:",
            TEST_SECRET,
            "127.0.0.1",
            18_080,
            "test",
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let ids: SharedIdGenerator = Arc::new(SequenceIdGenerator::default());
        let services = AppServices::new(db_arc.clone(), event_sender.clone(), ids);

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            event_sender,
            services,
        };

        let verifier = Arc::new(AuthVerifier::new(&cfg.jwt_secret));
        let router = Router::new()
            .merge(sampletrack_api::system_routes())
            .merge(sampletrack_api::api_routes(verifier))
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    pub fn token(&self, emp_code: &str, role: Role) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: emp_code.to_string(),
            name: format!("{} (test)", emp_code),
            role,
            region: "North".into(),
            branch: "Central".into(),
            iat: now,
            exp: now + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("token encoding")
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request should not error at the transport level");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(token), Some(body))
            .await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(token), Some(body))
            .await
    }

    /// Clone of the router for issuing concurrent requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the body of an allocation request from `(emp_code, qty)` pairs.
pub fn employees(lines: &[(&str, i32)]) -> Value {
    Value::Array(
        lines
            .iter()
            .map(|(code, qty)| {
                serde_json::json!({
                    "emp_code": code,
                    "name": format!("{} (employee)", code),
                    "qty": qty,
                })
            })
            .collect(),
    )
}
