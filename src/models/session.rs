//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session entity binding an opaque bearer token to a user.
///
/// A session is fixed-TTL: `expires_at` is set once at creation and never
/// extended. Expiry is evaluated when the token is checked, not when the row
/// is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Row ID, assigned by the database
    pub id: i64,
    /// Opaque token (unique, random hex)
    pub token: String,
    /// Owning user ID
    pub user_id: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring_in(delta: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: 1,
            token: "token".to_string(),
            user_id: 1,
            created_at: now,
            expires_at: now + delta,
        }
    }

    #[test]
    fn test_future_expiry_is_not_expired() {
        assert!(!session_expiring_in(Duration::hours(1)).is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        assert!(session_expiring_in(Duration::hours(-1)).is_expired());
    }
}
