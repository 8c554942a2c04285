//! # API Envelope
//!
//! The `{error, data}` JSON envelope every endpoint responds with.
//!
//! Success carries `data` and a null `error`; failure carries the error
//! message and a null `data`. Only the message text crosses the boundary,
//! never internals or stack traces.

use serde::{Deserialize, Serialize};

/// Response envelope: exactly one of `error` / `data` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Wraps a successful payload.
    pub fn ok(data: T) -> Self {
        ApiEnvelope {
            error: None,
            data: Some(data),
        }
    }

    /// Wraps a failure message.
    pub fn err(message: impl Into<String>) -> Self {
        ApiEnvelope {
            error: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_shape() {
        let json = serde_json::to_value(ApiEnvelope::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "error": null, "data": [1, 2] }));
    }

    #[test]
    fn test_err_shape() {
        let json = serde_json::to_value(ApiEnvelope::<()>::err("Customer not found")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "Customer not found", "data": null })
        );
    }
}
