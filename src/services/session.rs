//! Session management
//!
//! The one stateful protocol in the crate: issuing opaque bearer tokens,
//! checking them against their fixed expiry, and retiring them.

use crate::db::repositories::{unique_violation_message, SessionRepository};
use crate::models::Session;
use anyhow::Context;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{Duration, Utc};
use data_encoding::HEXLOWER;
use std::sync::Arc;

/// Number of random bytes per token; 32 bytes = 256 bits of entropy,
/// 64 hex characters on the wire.
const TOKEN_BYTES: usize = 32;

/// How many times to re-draw a token when the store reports a collision.
/// Collisions on 256-bit tokens are effectively impossible; this bound exists
/// so a misbehaving store cannot spin the loop forever.
const MAX_COLLISION_RETRIES: usize = 3;

/// Default session time-to-live in hours
const DEFAULT_TTL_HOURS: i64 = 24;

/// Error types for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token is unknown or the session has expired. The two cases are
    /// deliberately not distinguished.
    #[error("Invalid or expired session")]
    Invalid,

    /// Underlying persistence failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Session manager
pub struct SessionService {
    session_repo: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl SessionService {
    /// Create a session service with the default 24-hour TTL
    pub fn new(session_repo: Arc<dyn SessionRepository>) -> Self {
        Self {
            session_repo,
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Create a session service with a custom TTL in hours
    pub fn with_ttl_hours(session_repo: Arc<dyn SessionRepository>, ttl_hours: i64) -> Self {
        Self {
            session_repo,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a new session for a user.
    ///
    /// Generates a random token, stamps the absolute expiry (now + TTL) and
    /// persists the session. The token is re-drawn only when the store's
    /// unique constraint reports a collision; any other persistence failure
    /// fails the call.
    pub async fn issue(&self, user_id: i64) -> Result<Session, SessionError> {
        for attempt in 0..=MAX_COLLISION_RETRIES {
            let now = Utc::now();
            let session = Session {
                id: 0,
                token: generate_token(),
                user_id,
                created_at: now,
                expires_at: now + self.ttl,
            };

            match self.session_repo.create(&session).await {
                Ok(created) => return Ok(created),
                Err(e) if unique_violation_message(&e).is_some() => {
                    tracing::warn!(attempt, "Session token collision, re-drawing");
                    continue;
                }
                Err(e) => return Err(SessionError::Internal(e.context("Failed to issue session"))),
            }
        }

        Err(SessionError::Internal(anyhow::anyhow!(
            "Token collision persisted across {} retries",
            MAX_COLLISION_RETRIES
        )))
    }

    /// Validate a token and return its session.
    ///
    /// An unknown token and an expired one both come back as
    /// `SessionError::Invalid`. Expiry is checked here, at verification time;
    /// the expiry is never refreshed (fixed TTL, not sliding).
    pub async fn validate(&self, token: &str) -> Result<Session, SessionError> {
        let session = self
            .session_repo
            .get_by_token(token)
            .await
            .context("Failed to look up session")?
            .ok_or(SessionError::Invalid)?;

        if session.is_expired() {
            // Opportunistic cleanup; the sweep task handles the rest
            let _ = self.session_repo.delete(token).await;
            return Err(SessionError::Invalid);
        }

        Ok(session)
    }

    /// Revoke a session.
    ///
    /// Returns `SessionError::Invalid` when no row matched; revoking an
    /// already-revoked token is harmless and callers may ignore the error.
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let matched = self
            .session_repo
            .delete(token)
            .await
            .context("Failed to revoke session")?;

        if matched {
            Ok(())
        } else {
            Err(SessionError::Invalid)
        }
    }

    /// Delete all expired session rows.
    ///
    /// Hygiene only: validation never trusts an expired row, but without the
    /// sweep the sessions table grows without bound.
    pub async fn sweep_expired(&self) -> Result<u64, SessionError> {
        let count = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to sweep expired sessions")?;

        Ok(count)
    }
}

/// Generate an opaque session token: 32 bytes from the OS RNG, hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    HEXLOWER.encode(&bytes)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn property_tokens_are_lowercase_hex(_dummy in 0..20i32) {
            let token = generate_token();
            prop_assert_eq!(token.len(), TOKEN_BYTES * 2);
            prop_assert!(token.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
