//! Shared API response types
//!
//! Every endpoint answers with the same envelope: a status discriminator, a
//! short human-readable message, and an optional payload. The discriminator is
//! a typed enum in code and serializes to the wire values `"s"` / `"e"` that
//! clients already expect.

use serde::{Deserialize, Serialize};

/// Envelope status discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// Success
    #[serde(rename = "s")]
    Success,
    /// Error
    #[serde(rename = "e")]
    Error,
}

/// Standard response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Success envelope with a payload
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Success envelope without a payload (e.g. logout)
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
        }
    }

    /// Error envelope; the payload slot stays empty
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_serializes_s() {
        let response = ApiResponse::success("ok", 42);
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(json["status"], "s");
        assert_eq!(json["message"], "ok");
        assert_eq!(json["data"], 42);
    }

    #[test]
    fn test_error_envelope_serializes_e_with_null_data() {
        let response: ApiResponse<()> = ApiResponse::error("boom");
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(json["status"], "e");
        assert!(json["data"].is_null());
    }
}
