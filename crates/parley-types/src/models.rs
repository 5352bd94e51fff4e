use serde::{Deserialize, Serialize};

use crate::links::ActionLink;

/// A provisioned account. `userID` is system-generated and immutable;
/// the nickname is the only field that may change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_action_links: Vec<ActionLink>,
}

/// A 1:1 conversation between two users. Participants and messages are
/// derived at read time from their own records — the room record itself
/// stores only the two participant ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    #[serde(rename = "chatRoomID")]
    pub chat_room_id: String,
    pub topic: String,
    /// First entry is the creator, second the invited participant.
    pub participants: Vec<User>,
    pub chat_messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_action_links: Vec<ActionLink>,
}

/// One message posted by a participant of a chat room.
///
/// Everything except the read receipt is immutable after creation; the
/// read receipt itself only ever moves from unread to read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "chatMessageID")]
    pub chat_message_id: String,
    #[serde(rename = "chatRoomID")]
    pub chat_room_id: String,
    #[serde(rename = "fromParticipantID")]
    pub from_participant_id: String,
    pub message: String,
    /// Server-stamped, millis since the epoch. Restamped on update.
    pub last_modified: i64,
    pub read_receipt: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_action_links: Vec<ActionLink>,
}

/// Pointer to a resource that changed since the client's last poll.
/// Ephemeral: built per poll, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// The changed record's lastModified, so a client can advance its
    /// watermark straight from the notifications it receives.
    pub timestamp: i64,
    #[serde(rename = "parentResourceID")]
    pub parent_resource_id: String,
    #[serde(rename = "subResourceID", skip_serializing_if = "Option::is_none")]
    pub sub_resource_id: Option<String>,
    pub links: Vec<String>,
}

impl Notification {
    pub fn user(user_id: String, timestamp: i64) -> Self {
        let link = crate::links::user(&user_id);
        Self {
            timestamp,
            parent_resource_id: user_id,
            sub_resource_id: None,
            links: vec![link],
        }
    }

    pub fn chat_room(chat_room_id: String, timestamp: i64) -> Self {
        let link = crate::links::chat_room(&chat_room_id);
        Self {
            timestamp,
            parent_resource_id: chat_room_id,
            sub_resource_id: None,
            links: vec![link],
        }
    }

    pub fn chat_message(chat_room_id: String, chat_message_id: String, timestamp: i64) -> Self {
        let link = crate::links::chat_message(&chat_room_id, &chat_message_id);
        Self {
            timestamp,
            parent_resource_id: chat_room_id,
            sub_resource_id: Some(chat_message_id),
            links: vec![link],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_the_public_contract() {
        let user = User {
            user_id: "USER:abc".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            nickname: "ada".into(),
            next_action_links: vec![],
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userID"], "USER:abc");
        assert_eq!(json["firstName"], "Ada");
        // empty affordances are omitted entirely
        assert!(json.get("nextActionLinks").is_none());
    }

    #[test]
    fn message_notification_addresses_both_levels() {
        let n = Notification::chat_message("CHATROOM:r".into(), "MESSAGE:CHATROOM:r:m".into(), 7);
        assert_eq!(n.parent_resource_id, "CHATROOM:r");
        assert_eq!(n.sub_resource_id.as_deref(), Some("MESSAGE:CHATROOM:r:m"));
        assert_eq!(n.links, vec!["/chatrooms/CHATROOM:r/chatmessages/MESSAGE:CHATROOM:r:m"]);
    }
}
