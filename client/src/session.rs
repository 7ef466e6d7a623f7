//! Session lifecycle: bootstrap, login, registration, logout.
//!
//! # Design
//! The manager is the only writer of the credential slot and of the
//! published [`AuthState`]. State goes out through a watch channel:
//! readers take cheap snapshots or await transitions, and the channel
//! keeps "credential present" and "authenticated" in lockstep because
//! both are written from the same guarded operations.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::gateway::{decode, ApiGateway, RequestOptions};
use crate::store::TokenStore;
use crate::types::{RegisterUser, Token, User};

/// Authentication state visible to the rest of the application.
///
/// `Unknown` and `Checking` are the loading phases: `Unknown` before
/// [`SessionManager::bootstrap`] has run, `Checking` while a stored token
/// is being verified. Views that depend on the session should wait for one
/// of the two terminal states before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unknown,
    Checking,
    Authenticated(User),
    Anonymous,
}

impl AuthState {
    /// True while the session has not yet reached a terminal state.
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Unknown | AuthState::Checking)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Owns the authenticated-user identity and the credential lifecycle.
///
/// Operations serialize on an internal guard: a second login or logout
/// issued while one is in flight waits for the first to finish instead of
/// interleaving credential writes.
pub struct SessionManager {
    gateway: ApiGateway,
    state: watch::Sender<AuthState>,
    op_guard: Mutex<()>,
}

impl SessionManager {
    pub fn new(gateway: ApiGateway) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            gateway,
            state,
            op_guard: Mutex::new(()),
        }
    }

    fn store(&self) -> Arc<dyn TokenStore> {
        self.gateway.token_store()
    }

    fn transition(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Subscription for state transitions. The receiver also holds a
    /// snapshot at all times.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.state.borrow(), AuthState::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Resolve the persisted credential into a session. Run once at
    /// startup, before anything that branches on authentication.
    ///
    /// With no stored token this settles `Anonymous` without touching the
    /// network. A stored token that no longer verifies is cleared and the
    /// session becomes `Anonymous`; that failure is absorbed here because
    /// there is no signed-in user to surface it to.
    pub async fn bootstrap(&self) -> AuthState {
        let _guard = self.op_guard.lock().await;
        if self.store().get().is_none() {
            info!("no stored credential, starting anonymous");
            self.transition(AuthState::Anonymous);
            return self.state();
        }

        self.transition(AuthState::Checking);
        match self.fetch_identity().await {
            Ok(user) => {
                info!(email = %user.email, "restored session from stored credential");
                self.transition(AuthState::Authenticated(user));
            }
            Err(e) => {
                warn!(err = %e, "stored credential failed verification, clearing it");
                self.store().clear();
                self.transition(AuthState::Anonymous);
            }
        }
        self.state()
    }

    /// Password-grant login. The issued token is stored before the
    /// identity fetch so that fetch is itself authorized; if any step
    /// fails the token is rolled back rather than left dangling, and the
    /// session lands `Anonymous`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let _guard = self.op_guard.lock().await;
        let result = self.login_inner(email, password).await;
        if let Err(e) = &result {
            info!(err = %e, "login failed");
            self.store().clear();
            self.transition(AuthState::Anonymous);
        }
        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let pairs = vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let payload = self
            .gateway
            .request("/auth/login", RequestOptions::post().form(pairs))
            .await?;
        let token: Token = decode(payload)?;
        self.store().set(&token.access_token);

        let user = self.fetch_identity().await?;
        info!(email = %user.email, "login succeeded");
        self.transition(AuthState::Authenticated(user));
        Ok(())
    }

    /// Create an account. Registration does not issue a token; callers log
    /// in separately afterwards.
    pub async fn register(&self, input: &RegisterUser) -> Result<User, ApiError> {
        let _guard = self.op_guard.lock().await;
        let payload = self
            .gateway
            .request("/auth/register", RequestOptions::post().json(json!(input)))
            .await?;
        let user: User = decode(payload)?;
        info!(email = %user.email, "registered new account");
        Ok(user)
    }

    /// Drop the session: clear the stored credential and become anonymous.
    /// Purely local, cannot fail.
    pub async fn logout(&self) {
        let _guard = self.op_guard.lock().await;
        self.store().clear();
        self.transition(AuthState::Anonymous);
        info!("logged out");
    }

    async fn fetch_identity(&self) -> Result<User, ApiError> {
        let payload = self.gateway.request("/users/me", RequestOptions::get()).await?;
        decode(payload)
    }
}
