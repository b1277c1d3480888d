//! Uniform API response envelope.
//!
//! Every endpoint wraps its payload in the same `{ status, data, message }`
//! shape, success and failure alike, so clients have one parsing path.

use serde::{Deserialize, Serialize};

/// Response envelope carried by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Payload. `null` for errors and data-less successes.
    pub data: Option<T>,
    /// Human-readable outcome description.
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Builds a success envelope.
    pub fn success(status: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status,
            data: Some(data),
            message: message.into(),
        }
    }

    /// Builds a success envelope with no payload.
    pub fn success_empty(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            data: None,
            message: message.into(),
        }
    }

    /// Builds an error envelope.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            data: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_data_and_message() {
        let res = ApiResponse::success(200, vec![1, 2, 3], "ok");
        assert_eq!(res.status, 200);
        assert_eq!(res.data, Some(vec![1, 2, 3]));
        assert_eq!(res.message, "ok");
    }

    #[test]
    fn error_has_no_data() {
        let res: ApiResponse<()> = ApiResponse::error(404, "Chat room not found");
        assert_eq!(res.status, 404);
        assert!(res.data.is_none());
        assert_eq!(res.message, "Chat room not found");
    }

    #[test]
    fn serializes_null_data() {
        let res: ApiResponse<()> = ApiResponse::success_empty(200, "Title updated");
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["status"], 200);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "Title updated");
    }
}
