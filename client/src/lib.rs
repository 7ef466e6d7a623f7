//! Client for a task-management service: password-grant authentication
//! with a persisted bearer token, typed task CRUD, and the view-state
//! reconciliation used after writes.
//!
//! # Overview
//! [`SessionManager`] owns the login/logout lifecycle and publishes
//! [`AuthState`] through snapshots and subscriptions. [`TaskClient`] is
//! typed CRUD over the task resource; [`TaskList`] keeps a view-local
//! collection in agreement with the server after every write. Everything
//! goes through [`ApiGateway`], which attaches the stored bearer token,
//! infers content types, and normalizes responses into
//! [`ApiError`]-classified results.
//!
//! # Design
//! - I/O and credential storage are injected capabilities
//!   ([`HttpTransport`], [`TokenStore`]), so unit tests run against fakes
//!   and integration tests against a live in-process server.
//! - All network operations are async and run on the caller's task; the
//!   library spawns nothing and never blocks.
//! - One error enum covers the whole surface, with HTTP statuses
//!   retrievable for callers that branch on them.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod session;
pub mod store;
pub mod tasklist;
pub mod tasks;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ApiConfig;
pub use error::ApiError;
pub use gateway::{ApiGateway, RequestOptions};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
pub use session::{AuthState, SessionManager};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use tasklist::TaskList;
pub use tasks::{TaskClient, DEFAULT_LIST_LIMIT};
pub use types::{CreateTask, RegisterUser, Task, TaskStatus, Token, UpdateTask, User, UserRole};
