//! Wire-level data model for the task service.
//!
//! # Design
//! Field names follow the service's snake_case JSON, so no serde renames
//! are needed beyond the enum value spellings. Request payloads and
//! responses are separate types: responses carry the server-assigned
//! fields (ids, owner, timestamps), requests only what the caller chooses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned by the service. The client never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

/// The authenticated user's profile as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A single task. `owner_id` is assigned by the service from the bearer
/// token; the client never filters by owner locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Successful login response. Only `access_token` is consumed; the token
/// type is always `bearer`.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Payload for `POST /auth/register`. `full_name` is serialized as an
/// explicit null when absent, matching what the service expects.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Payload for `POST /tasks`. All fields are always sent; a task starts
/// `Pending` unless the caller says otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

/// Payload for `PUT /tasks/{id}`. Unset fields are omitted from the JSON
/// entirely and left unchanged by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}
