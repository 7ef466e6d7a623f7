//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, RequestBody};

/// Scripted transport: hands out canned results in order and records every
/// request it sees.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<Vec<Result<HttpResponse, ApiError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push(Ok(HttpResponse { status, body: body.into() }));
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_response(status, body.to_string());
    }

    pub fn push_error(&self, error: ApiError) {
        self.script.lock().unwrap().push(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        // real transports always yield at least once, so state published
        // before the call is observable to concurrent subscribers
        tokio::task::yield_now().await;
        let url = request.url.clone();
        self.seen.lock().unwrap().push(request);
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            panic!("unscripted request: {url}");
        }
        script.remove(0)
    }
}

/// JSON body of a request, or a panic if the request carried none.
pub fn json_body(request: &HttpRequest) -> Value {
    match &request.body {
        Some(RequestBody::Json(raw)) => serde_json::from_str(raw).unwrap(),
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

pub fn user_json(id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "full_name": null,
        "role": "user",
        "is_active": true,
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:00Z",
    })
}

pub fn task_json(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status": status,
        "owner_id": 1,
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:00Z",
    })
}
