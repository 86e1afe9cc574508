//! The JSON envelope every endpoint answers with.

use serde::{Deserialize, Serialize};

/// `{success, message?, data?, error?}`. Absent fields are omitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope without payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let ok = serde_json::to_value(ApiResponse::success("Done", vec![1, 2])).unwrap();
        assert_eq!(ok, json!({ "success": true, "message": "Done", "data": [1, 2] }));

        let err = serde_json::to_value(ApiResponse::<()>::error("Forbidden")).unwrap();
        assert_eq!(err, json!({ "success": false, "error": "Forbidden" }));

        let bare = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert_eq!(bare, json!({ "success": true, "message": "Deleted" }));
    }
}
