//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The password hash never leaves the process: it is skipped during
/// serialization and only read by the password verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the database
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2 PHC string)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a user record prior to insertion.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password`.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0, // assigned by the database
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "alice".to_string(),
            "a@x.com".to_string(),
            "hash".to_string(),
        );
        assert_eq!(user.id, 0);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.com");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "alice".to_string(),
            "a@x.com".to_string(),
            "super-secret-hash".to_string(),
        );
        let json = serde_json::to_string(&user).expect("Failed to serialize");
        assert!(!json.contains("super-secret-hash"));
        assert!(!json.contains("password_hash"));
    }
}
