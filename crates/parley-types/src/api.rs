//! Request payloads accepted by the HTTP layer.
//!
//! These deliberately do NOT use `deny_unknown_fields`: clients routinely
//! echo back full resource representations, including system-generated
//! fields. Anything a client is not allowed to set is carried as an
//! `Option` here and discarded (with a warning) by the service layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Ignored; user ids are system-generated.
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,
    /// Ignored; immutable after creation.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Ignored; immutable after creation.
    #[serde(default)]
    pub last_name: Option<String>,
    /// The one mutable User field.
    #[serde(default)]
    pub nickname: Option<String>,
}

/// A participant named by id only. The full User payload a client may send
/// here collapses to its id; everything else comes from the user's own record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRef {
    #[serde(rename = "userID")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRoomRequest {
    /// Ignored; room ids are system-generated.
    #[serde(rename = "chatRoomID", default)]
    pub chat_room_id: Option<String>,
    pub topic: String,
    /// Exactly two, creator first. Arity is part of the payload shape, so a
    /// wrong-sized list is rejected at parse time.
    pub participants: [ParticipantRef; 2],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatRoomRequest {
    #[serde(rename = "chatRoomID", default)]
    pub chat_room_id: Option<String>,
    /// The one mutable ChatRoom field.
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostChatMessageRequest {
    /// Ignored; message ids are system-generated.
    #[serde(rename = "chatMessageID", default)]
    pub chat_message_id: Option<String>,
    /// Ignored; the owning room comes from the request path.
    #[serde(rename = "chatRoomID", default)]
    pub chat_room_id: Option<String>,
    #[serde(rename = "fromParticipantID", default)]
    pub from_participant_id: String,
    #[serde(default)]
    pub message: String,
    /// Ignored; a new message cannot have been read yet.
    #[serde(default)]
    pub read_receipt: Option<bool>,
    /// Ignored; timestamps are server-stamped.
    #[serde(default)]
    pub last_modified: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChatMessageRequest {
    #[serde(rename = "chatMessageID", default)]
    pub chat_message_id: Option<String>,
    /// Ignored; immutable after creation.
    #[serde(rename = "fromParticipantID", default)]
    pub from_participant_id: Option<String>,
    /// Ignored; immutable after creation.
    #[serde(default)]
    pub message: Option<String>,
    /// The one mutable ChatMessage field. Monotonic: read never reverts.
    #[serde(default)]
    pub read_receipt: Option<bool>,
    #[serde(default)]
    pub last_modified: Option<i64>,
}

/// `GET /notifications` query string.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationQuery {
    /// Watermark: the last timestamp this client observed, millis.
    /// Absent on a client's first poll.
    pub since: Option<i64>,
    /// Simulate-activity affordance: the room to manufacture messages in.
    #[serde(rename = "chatroomID")]
    pub chatroom_id: Option<String>,
    #[serde(default)]
    pub test: bool,
    /// How many messages to manufacture when `test` is set.
    pub count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_create_payload_still_parses() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"userID":"USER:sneaky","firstName":"A","lastName":"B","nickname":"ab","unknown":1}"#,
        )
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("USER:sneaky"));
    }

    #[test]
    fn chat_room_arity_is_enforced_by_the_payload_shape() {
        let one = r#"{"topic":"t","participants":[{"userID":"USER:a"}]}"#;
        assert!(serde_json::from_str::<CreateChatRoomRequest>(one).is_err());

        let three =
            r#"{"topic":"t","participants":[{"userID":"a"},{"userID":"b"},{"userID":"c"}]}"#;
        assert!(serde_json::from_str::<CreateChatRoomRequest>(three).is_err());

        let two = r#"{"topic":"t","participants":[{"userID":"USER:a"},{"userID":"USER:b"}]}"#;
        let req = serde_json::from_str::<CreateChatRoomRequest>(two).unwrap();
        assert_eq!(req.participants[0].user_id, "USER:a");
    }
}
