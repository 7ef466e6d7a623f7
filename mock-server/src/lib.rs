//! In-memory double of the task service.
//!
//! # Design
//! Implements the `/api/v1` surface the client consumes: registration,
//! password-grant login, the current-user projection, and bearer-scoped
//! task CRUD, all against process-local state. Handlers mirror the real
//! service's status codes and `detail` messages so client tests exercise
//! the same classification paths they would in production. Tasks live in
//! a `BTreeMap`, which gives listings a stable id order. Passwords are
//! stored as plain strings; this is a test double, not a service.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// Error body in the service's shape.
#[derive(Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

struct UserRecord {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct ServiceState {
    users: BTreeMap<i64, UserRecord>,
    tasks: BTreeMap<i64, Task>,
    sessions: HashMap<String, i64>,
    next_user_id: i64,
    next_task_id: i64,
}

impl ServiceState {
    fn insert_user(&mut self, input: RegisterRequest) -> User {
        self.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: self.next_user_id,
            email: input.email,
            full_name: input.full_name,
            role: UserRole::User,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password: input.password,
            },
        );
        user
    }

    fn insert_task(&mut self, input: CreateTaskRequest, owner_id: i64) -> Task {
        self.next_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: self.next_task_id,
            title: input.title,
            description: input.description,
            status: input.status,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id, task.clone());
        task
    }
}

pub type SharedState = Arc<RwLock<ServiceState>>;

type Rejection = (StatusCode, Json<ErrorDetail>);

pub fn app() -> Router {
    let state: SharedState = Arc::new(RwLock::new(ServiceState::default()));
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reject(status: StatusCode, detail: &str) -> Rejection {
    (
        status,
        Json(ErrorDetail {
            detail: detail.to_string(),
        }),
    )
}

fn not_found(id: i64) -> Rejection {
    reject(StatusCode::NOT_FOUND, &format!("Task with id {id} not found"))
}

/// Resolve the bearer token to a user id. A missing or malformed header
/// and an unknown token get distinct messages, like the real service.
fn authorize(state: &ServiceState, headers: &HeaderMap) -> Result<i64, Rejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    state
        .sessions
        .get(token)
        .copied()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
}

fn validate_title(title: &str) -> Result<(), Rejection> {
    if title.is_empty() {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Title must not be empty"));
    }
    if title.len() > 255 {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Title must be at most 255 characters",
        ));
    }
    Ok(())
}

async fn register(
    State(state): State<SharedState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), Rejection> {
    if !input.email.contains('@') {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Invalid email address"));
    }
    if input.password.len() < 8 {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Password must be at least 8 characters",
        ));
    }
    let mut state = state.write().await;
    if state.users.values().any(|r| r.user.email == input.email) {
        return Err(reject(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let user = state.insert_user(input);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, Rejection> {
    let mut state = state.write().await;
    let user_id = state
        .users
        .values()
        .find(|r| r.user.email == form.username && r.password == form.password)
        .map(|r| r.user.id)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Incorrect email or password"))?;

    let token = Uuid::new_v4().to_string();
    state.sessions.insert(token.clone(), user_id);
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

async fn me(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<User>, Rejection> {
    let state = state.read().await;
    let user_id = authorize(&state, &headers)?;
    let user = state
        .users
        .get(&user_id)
        .map(|r| r.user.clone())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;
    Ok(Json(user))
}

async fn list_tasks(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Task>>, Rejection> {
    if page.limit < 1 || page.limit > 100 {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Limit must be between 1 and 100",
        ));
    }
    let state = state.read().await;
    let owner_id = authorize(&state, &headers)?;
    let tasks = state
        .tasks
        .values()
        .filter(|t| t.owner_id == owner_id)
        .skip(page.skip)
        .take(page.limit)
        .cloned()
        .collect();
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(input): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), Rejection> {
    let mut state = state.write().await;
    let owner_id = authorize(&state, &headers)?;
    validate_title(&input.title)?;
    let task = state.insert_task(input, owner_id);
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Task>, Rejection> {
    let state = state.read().await;
    let owner_id = authorize(&state, &headers)?;
    // existence of other users' tasks is hidden, not forbidden
    state
        .tasks
        .get(&id)
        .filter(|t| t.owner_id == owner_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn update_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, Rejection> {
    let mut state = state.write().await;
    let owner_id = authorize(&state, &headers)?;
    if let Some(title) = &input.title {
        validate_title(title)?;
    }
    let task = state
        .tasks
        .get_mut(&id)
        .filter(|t| t.owner_id == owner_id)
        .ok_or_else(|| not_found(id))?;
    if let Some(title) = input.title {
        task.title = title;
    }
    if let Some(description) = input.description {
        task.description = Some(description);
    }
    if let Some(status) = input.status {
        task.status = status;
    }
    task.updated_at = Utc::now();
    Ok(Json(task.clone()))
}

async fn delete_task(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, Rejection> {
    let mut state = state.write().await;
    let owner_id = authorize(&state, &headers)?;
    if state.tasks.get(&id).filter(|t| t.owner_id == owner_id).is_none() {
        return Err(not_found(id));
    }
    state.tasks.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
