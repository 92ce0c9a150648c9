//! Router-level test harness backed by the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone(),
            config: Config::test_default(),
        };
        TestApp {
            router: build_router(state),
            store,
        }
    }

    /// Sends a request, authenticating with `token` as a bearer header.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Like `send`, decoding the body as JSON (`Null` when empty).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        (status, json_body(response).await)
    }

    /// Registers a user with password `password123` and returns its session token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({"email": email, "password": "password123"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates an application with the required fields and returns its id.
    pub async fn create_application(&self, token: &str, company: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/applications",
                Some(token),
                Some(json!({
                    "company": company,
                    "position": "Software Engineer",
                    "location": "Remote",
                    "status": "Applied",
                    "appliedDate": "2024-03-01"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a reminder on `application_id` and returns its id.
    pub async fn create_reminder(
        &self,
        token: &str,
        application_id: &str,
        due: &str,
        description: &str,
    ) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/reminders",
                Some(token),
                Some(json!({
                    "applicationId": application_id,
                    "dueDate": due,
                    "description": description
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create reminder failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let text = body_text(response).await;
    if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    }
}
