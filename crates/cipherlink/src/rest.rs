//! Auxiliary REST surface: room creation and the liveness probe.
//!
//! Rooms are created over plain HTTP before the WebSocket join; the
//! health probe exists for diagnostics and promises nothing beyond its
//! status code.

use serde::Deserialize;

use cipherlink_protocol::RoomId;

use crate::ClientError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomResponse {
    success: bool,
    #[serde(default)]
    room_id: Option<RoomId>,
    #[serde(default)]
    error: Option<String>,
}

/// Creates a room via `POST /api/rooms` and returns its id.
///
/// # Errors
/// [`ClientError::Http`] on transport/status failures,
/// [`ClientError::Api`] when the server answers with
/// `success == false` or an id-less success.
pub async fn create_room(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<RoomId, ClientError> {
    let url = format!("{}/api/rooms", base_url.trim_end_matches('/'));
    let body: CreateRoomResponse = http
        .post(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if !body.success {
        return Err(ClientError::Api(
            body.error
                .unwrap_or_else(|| "room creation failed".to_owned()),
        ));
    }
    body.room_id.ok_or_else(|| {
        ClientError::Api("room created without a room id".to_owned())
    })
}

/// Probes `GET /api/health`. Success is the status code alone.
pub async fn health(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<(), ClientError> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    http.get(&url).send().await?.error_for_status()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_response_parses_success() {
        let body: CreateRoomResponse = serde_json::from_str(
            r#"{"success": true, "roomId": "r-42"}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.room_id, Some(RoomId::from("r-42")));
    }

    #[test]
    fn test_create_room_response_parses_failure() {
        let body: CreateRoomResponse = serde_json::from_str(
            r#"{"success": false, "error": "at capacity"}"#,
        )
        .unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("at capacity"));
    }
}
