//! Authentication service
//!
//! Composes the user repository, the password hasher, and the session
//! manager into the four operations the handlers call: signup, login, logout,
//! and the authentication gate for protected routes.

use crate::db::repositories::{unique_violation_message, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use crate::services::session::{SessionError, SessionService};
use anyhow::Context;
use std::sync::Arc;

/// A well-formed Argon2id digest that matches no password. Login verifies
/// against it when the username is unknown so that path costs the same as a
/// wrong password, instead of returning measurably faster.
const DUMMY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Z3VhcmRyYWlsc2FsdA$qCJ9pdM1k1lLYLLJfuNrCWZTmuPYpvC+9hC8nNw3d9M";

/// Error types for auth operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Malformed or missing input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Username or email already taken
    #[error("{0}")]
    Duplicate(String),

    /// Bad credentials. Unknown username and wrong password are the same
    /// error on purpose, so the API cannot be used to enumerate usernames.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Missing, unknown, or expired session token
    #[error("Invalid or expired session")]
    InvalidSession,

    /// Underlying failure; the message shown to callers stays generic
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AuthServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Invalid => AuthServiceError::InvalidSession,
            SessionError::Internal(e) => AuthServiceError::Internal(e),
        }
    }
}

/// Input for signup
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Auth service composing credential storage, hashing, and sessions
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    sessions: SessionService,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(user_repo: Arc<dyn UserRepository>, sessions: SessionService) -> Self {
        Self { user_repo, sessions }
    }

    /// Register a new user and log them in.
    ///
    /// Hashes the password, inserts the user, then issues a session. If the
    /// session insert fails after the user row is committed, the user record
    /// stays: the two stores are not wrapped in one transaction, and the
    /// caller is expected to retry via login.
    pub async fn sign_up(
        &self,
        input: SignUpInput,
    ) -> Result<(User, Session), AuthServiceError> {
        validate_sign_up(&input)?;

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;
        let user = User::new(input.username, input.email, password_hash);

        let created = match self.user_repo.create(&user).await {
            Ok(created) => created,
            Err(e) => return Err(translate_duplicate(e)),
        };

        let session = self.sessions.issue(created.id).await?;
        Ok((created, session))
    }

    /// Log in with username and password.
    ///
    /// A missing username and a wrong password both come back as
    /// `InvalidCredentials`.
    pub async fn log_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, Session), AuthServiceError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to look up user")?;

        let Some(user) = user else {
            let _ = verify_password(password, DUMMY_DIGEST);
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let session = self.sessions.issue(user.id).await?;
        Ok((user, session))
    }

    /// Log out by revoking the session token.
    ///
    /// Revoking a token that is already gone yields `InvalidSession`; callers
    /// treating logout as idempotent may ignore it.
    pub async fn log_out(&self, token: &str) -> Result<(), AuthServiceError> {
        self.sessions.revoke(token).await?;
        Ok(())
    }

    /// Resolve a bearer token to its user.
    ///
    /// This is the gate every protected operation calls before touching a
    /// user-scoped resource.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthServiceError> {
        let session = self.sessions.validate(token).await?;

        self.user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")?
            // The user was deleted out from under a live session
            .ok_or(AuthServiceError::InvalidSession)
    }

    /// Access to the underlying session manager (for the sweep task)
    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }
}

fn validate_sign_up(input: &SignUpInput) -> Result<(), AuthServiceError> {
    if input.username.trim().is_empty() {
        return Err(AuthServiceError::Validation(
            "Username cannot be empty".to_string(),
        ));
    }
    if input.email.trim().is_empty() {
        return Err(AuthServiceError::Validation(
            "Email cannot be empty".to_string(),
        ));
    }
    if input.password.is_empty() {
        return Err(AuthServiceError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }
    if !input.email.contains('@') {
        return Err(AuthServiceError::Validation(
            "Invalid email format".to_string(),
        ));
    }
    Ok(())
}

/// Turn a store-level unique violation into a `Duplicate` error with a short
/// field-specific message; anything else stays an internal error.
fn translate_duplicate(err: anyhow::Error) -> AuthServiceError {
    match unique_violation_message(&err) {
        Some(message) if message.contains("username") => {
            AuthServiceError::Duplicate("Username is already taken".to_string())
        }
        Some(message) if message.contains("email") => {
            AuthServiceError::Duplicate("Email is already registered".to_string())
        }
        Some(_) => AuthServiceError::Duplicate("User already exists".to_string()),
        None => AuthServiceError::Internal(err.context("Failed to create user")),
    }
}
