//! Password hashing
//!
//! Secure password hashing and verification using Argon2id.
//!
//! # Security
//!
//! - Argon2id variant with the argon2 crate's default cost parameters
//! - A fresh random salt per hash
//! - Verification is constant-time in the digest comparison, and a malformed
//!   stored digest is reported exactly like a wrong password so callers cannot
//!   tell "bad credentials" from "corrupt record"

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password using Argon2id with secure defaults.
///
/// Returns the digest in PHC string format (algorithm, parameters, salt, and
/// hash are all self-described).
///
/// # Errors
///
/// Fails only if the hashing primitive itself fails; there is nothing useful a
/// caller can do but give up on the request.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let digest = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    Ok(digest.to_string())
}

/// Verify a password against a stored digest.
///
/// Returns `false` on any mismatch, including an unparseable digest. The
/// plaintext is never logged or stored.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_argon2id_digest() {
        let digest = hash_password("test_password_123").expect("Failed to hash password");
        assert!(digest.starts_with("$argon2id$"), "Digest should use Argon2id");
    }

    #[test]
    fn test_hash_password_salts_each_digest() {
        let digest1 = hash_password("same_password").expect("Failed to hash password");
        let digest2 = hash_password("same_password").expect("Failed to hash password");
        assert_ne!(digest1, digest2, "Random salt should make digests differ");
    }

    #[test]
    fn test_verify_password_correct() {
        let digest = hash_password("correct_password").expect("Failed to hash password");
        assert!(verify_password("correct_password", &digest));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let digest = hash_password("correct_password").expect("Failed to hash password");
        assert!(!verify_password("wrong_password", &digest));
    }

    #[test]
    fn test_verify_password_malformed_digest_is_just_false() {
        // A corrupt record must be indistinguishable from a wrong password
        assert!(!verify_password("password", "not-a-digest"));
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "$argon2id$garbage"));
    }

    #[test]
    fn test_verify_password_unicode() {
        let digest = hash_password("пароль🔐").expect("Failed to hash unicode password");
        assert!(verify_password("пароль🔐", &digest));
        assert!(!verify_password("пароль", &digest));
    }

    #[test]
    fn test_digest_does_not_contain_password() {
        let digest = hash_password("my_secret_password").expect("Failed to hash password");
        assert!(!digest.contains("my_secret_password"));
    }
}
