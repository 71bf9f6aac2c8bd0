//! `/api` message intake
//!
//! GET always acknowledges. POST acknowledges a JSON object whose `message`
//! field is a string, empty strings included.

use axum::body::Bytes;
use serde_json::Value;

use crate::{error::{Error, Result}, responses::StatusMessage};

const RECEIVED: &str = "Data successfully received";
const INVALID_MESSAGE: &str = "Invalid JSON message";

/// GET /api
pub async fn receive_get() -> StatusMessage {
    StatusMessage::success(RECEIVED)
}

/// POST /api
pub async fn receive_post(body: Bytes) -> Result<StatusMessage> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|_| Error::InvalidInput(INVALID_MESSAGE.to_string()))?;

    match value.get("message") {
        Some(Value::String(message)) => {
            tracing::debug!(length = message.len(), "Message received");
            Ok(StatusMessage::success(RECEIVED))
        }
        _ => Err(Error::InvalidInput(INVALID_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_acknowledges() {
        let msg = receive_get().await;
        assert_eq!(msg.status, "success");
        assert_eq!(msg.message, RECEIVED);
    }

    #[tokio::test]
    async fn test_post_accepts_string_message() {
        for body in [&br#"{"message": "hello"}"#[..], br#"{"message": ""}"#] {
            let msg = receive_post(Bytes::from_static(body)).await.unwrap();
            assert_eq!(msg.message, RECEIVED);
        }
    }

    #[tokio::test]
    async fn test_post_rejects_everything_else() {
        for body in [
            &br#"{"message": 42}"#[..],
            br#"{"email": "a@b.c"}"#,
            br#"["message"]"#,
            b"null",
            b"{",
        ] {
            let err = receive_post(Bytes::from_static(body)).await.unwrap_err();
            assert_eq!(err.public_message(), INVALID_MESSAGE);
        }
    }
}
