//! Response envelopes
//!
//! The API speaks two shapes besides bare User objects and arrays:
//!
//! - the simple envelope `{"status": "success"|"fail", "message": "..."}`,
//!   optionally carrying the `id` of a created document;
//! - the pagination envelope returned by `/users/filter`.
//!
//! ```rust
//! use users_service::responses::StatusMessage;
//!
//! let ok = StatusMessage::success("User deleted successfully");
//! assert_eq!(ok.status, "success");
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;

const SUCCESS: &str = "success";
const FAIL: &str = "fail";

// ============================================================================
// Simple envelope
// ============================================================================

/// `{status, message}` envelope, with `id` on create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Either `success` or `fail`
    pub status: String,

    /// Human readable outcome
    pub message: String,

    /// Identifier of the document a create produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
}

impl StatusMessage {
    /// Successful outcome
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.into(),
            id: None,
        }
    }

    /// Failed outcome
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: FAIL.to_string(),
            message: message.into(),
            id: None,
        }
    }

    /// Attach the id of a created document
    #[must_use]
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }
}

// Handlers only return success envelopes; failures go through `Error`
impl IntoResponse for StatusMessage {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// ============================================================================
// Pagination envelope
// ============================================================================

/// Envelope returned by the filtered listing
///
/// Field names are part of the wire contract and stay camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    /// Always `success`
    pub status: String,

    /// 1-indexed page that was served
    pub current_page: u64,

    /// Page size that was applied
    pub limit: u64,

    /// Number of documents matching the filter before pagination
    pub total_users: u64,

    /// `ceil(total_users / limit)`
    pub total_pages: u64,

    /// Documents on this page
    pub users: Vec<T>,
}

impl<T> PageEnvelope<T> {
    /// Successful page
    pub fn new(
        current_page: u64,
        limit: u64,
        total_users: u64,
        total_pages: u64,
        users: Vec<T>,
    ) -> Self {
        Self {
            status: SUCCESS.to_string(),
            current_page,
            limit,
            total_users,
            total_pages,
            users,
        }
    }
}

impl<T> PageEnvelope<T> {
    /// Same page with each document converted
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageEnvelope<U> {
        PageEnvelope {
            status: self.status,
            current_page: self.current_page,
            limit: self.limit,
            total_users: self.total_users,
            total_pages: self.total_pages,
            users: self.users.into_iter().map(f).collect(),
        }
    }
}

impl<T: Serialize> IntoResponse for PageEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_success_envelope_omits_id() {
        let json = serde_json::to_value(StatusMessage::success("done")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "message": "done"}));
    }

    #[test]
    fn test_created_envelope_carries_id() {
        let id = ObjectId::from_str("65a1b2c3d4e5f60718293a4b").unwrap();
        let json =
            serde_json::to_value(StatusMessage::success("User created successfully").with_id(id))
                .unwrap();
        assert_eq!(json["id"], "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_fail_envelope() {
        let msg = StatusMessage::fail("Invalid JSON message");
        assert_eq!(msg.status, "fail");
        assert_eq!(msg.id, None);
    }

    #[tokio::test]
    async fn test_success_envelope_response_is_ok() {
        let response = StatusMessage::success("User updated successfully").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_page_envelope_wire_names() {
        let page = PageEnvelope::new(2, 3, 7, 3, vec![1, 2, 3]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["limit"], 3);
        assert_eq!(json["totalUsers"], 7);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["users"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_page_envelope_map_keeps_counts() {
        let page = PageEnvelope::new(1, 6, 2, 1, vec![1, 2]).map(|n| n * 10);
        assert_eq!(page.users, [10, 20]);
        assert_eq!(page.total_users, 2);
        assert_eq!(page.status, "success");
    }

    #[test]
    fn test_page_envelope_empty_users_is_array() {
        let page: PageEnvelope<u8> = PageEnvelope::new(9, 6, 7, 2, Vec::new());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["users"], serde_json::json!([]));
    }
}
