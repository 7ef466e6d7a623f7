//! Typed CRUD over the task resource family.

use serde_json::json;

use crate::error::ApiError;
use crate::gateway::{decode, ApiGateway, RequestOptions};
use crate::types::{CreateTask, Task, UpdateTask};

/// Page size used when the caller has no opinion; also the service's cap.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Typed task operations. Every call requires an authenticated session;
/// the service enforces that, the client does not pre-check.
#[derive(Clone)]
pub struct TaskClient {
    gateway: ApiGateway,
}

impl TaskClient {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Fetch one page of the caller's tasks, in stable id order.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Task>, ApiError> {
        let path = format!("/tasks?skip={skip}&limit={limit}");
        let payload = self.gateway.request(&path, RequestOptions::get()).await?;
        decode(payload)
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        let payload = self
            .gateway
            .request(&format!("/tasks/{id}"), RequestOptions::get())
            .await?;
        decode(payload)
    }

    /// Create a task. An empty title fails client-side before any request
    /// is made; the service re-validates, including the length cap.
    pub async fn create(&self, input: &CreateTask) -> Result<Task, ApiError> {
        if input.title.is_empty() {
            return Err(ApiError::Validation("task title must not be empty".to_string()));
        }
        let payload = self
            .gateway
            .request("/tasks", RequestOptions::post().json(json!(input)))
            .await?;
        decode(payload)
    }

    /// Partial update: only the fields set in `input` are sent or changed.
    pub async fn update(&self, id: i64, input: &UpdateTask) -> Result<Task, ApiError> {
        let payload = self
            .gateway
            .request(&format!("/tasks/{id}"), RequestOptions::put().json(json!(input)))
            .await?;
        decode(payload)
    }

    /// Delete a task. The service answers 204; deleting the same id twice
    /// fails the second time with a not-found error.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.gateway
            .request(&format!("/tasks/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }
}
