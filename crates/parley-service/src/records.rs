//! Flat record types — the store-native shape of each resource, distinct
//! from the consumer-facing models in `parley-types`.
//!
//! Creation mapping mints a fresh identifier and stamps `lastmodified`
//! from the server clock; whatever id or timestamp the client supplied has
//! already been discarded by the time a record is built. Load mapping
//! reads field by field: an absent identity field means the record does
//! not exist (`NotFound`), while any other absent or unreadable required
//! field is a `CorruptRecord`.

use parley_store::keys;
use parley_store::{Fields, KeyValueStore};
use parley_types::api::CreateUserRequest;
use parley_types::models::{ChatMessage, User};

use crate::error::{Result, ServiceError};

/// Store field names. Public contract with anything else reading the
/// store; renaming one is a data migration.
pub mod fields {
    pub const USER_ID: &str = "userid";
    pub const FIRST_NAME: &str = "firstname";
    pub const LAST_NAME: &str = "lastname";
    pub const NICKNAME: &str = "nickname";

    pub const CHATROOM_ID: &str = "chatroomid";
    pub const TOPIC: &str = "topic";
    pub const CREATOR_USER_ID: &str = "chatroomcreatoruserid";
    pub const PARTICIPANT_USER_ID: &str = "chatroomparticipantid";

    pub const CHATMESSAGE_ID: &str = "chatmessageid";
    pub const FROM_PARTICIPANT_ID: &str = "fromparticipantid";
    pub const MESSAGE: &str = "message";
    pub const READ_RECEIPT: &str = "readreceipt";

    pub const LAST_MODIFIED: &str = "lastmodified";
}

fn corrupt(key: &str, field: &str) -> ServiceError {
    ServiceError::CorruptRecord {
        key: key.to_string(),
        field: field.to_string(),
    }
}

/// Read the field whose presence defines record existence.
fn identity(store: &dyn KeyValueStore, key: &str, field: &str) -> Result<String> {
    store
        .get_field(key, field)?
        .ok_or_else(|| ServiceError::NotFound(key.to_string()))
}

fn required(store: &dyn KeyValueStore, key: &str, field: &str) -> Result<String> {
    store.get_field(key, field)?.ok_or_else(|| corrupt(key, field))
}

pub(crate) fn required_millis(store: &dyn KeyValueStore, key: &str, field: &str) -> Result<i64> {
    required(store, key, field)?.parse().map_err(|_| corrupt(key, field))
}

fn required_bool(store: &dyn KeyValueStore, key: &str, field: &str) -> Result<bool> {
    required(store, key, field)?.parse().map_err(|_| corrupt(key, field))
}

// -- User --

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub last_modified: i64,
}

impl UserRecord {
    pub fn from_input(req: &CreateUserRequest, now: i64) -> Self {
        Self {
            user_id: keys::mint_user_id(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            nickname: req.nickname.clone(),
            last_modified: now,
        }
    }

    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Self> {
        let user_id = identity(store, key, fields::USER_ID)?;
        Ok(Self {
            first_name: required(store, key, fields::FIRST_NAME)?,
            last_name: required(store, key, fields::LAST_NAME)?,
            nickname: required(store, key, fields::NICKNAME)?,
            last_modified: required_millis(store, key, fields::LAST_MODIFIED)?,
            user_id,
        })
    }

    pub fn to_fields(&self) -> Fields {
        Fields::from([
            (fields::USER_ID.into(), self.user_id.clone()),
            (fields::FIRST_NAME.into(), self.first_name.clone()),
            (fields::LAST_NAME.into(), self.last_name.clone()),
            (fields::NICKNAME.into(), self.nickname.clone()),
            (fields::LAST_MODIFIED.into(), self.last_modified.to_string()),
        ])
    }

    pub fn into_resource(self) -> User {
        User {
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            nickname: self.nickname,
            next_action_links: Vec::new(),
        }
    }
}

// -- ChatRoom --

/// The room record stores only the two participant ids, never their
/// payloads: participants and messages are resolved by id at read time,
/// so there are no stale embedded copies to chase.
#[derive(Debug, Clone)]
pub struct ChatRoomRecord {
    pub chat_room_id: String,
    pub topic: String,
    pub creator_user_id: String,
    pub participant_user_id: String,
    pub last_modified: i64,
}

impl ChatRoomRecord {
    pub fn from_input(topic: &str, creator_user_id: &str, participant_user_id: &str, now: i64) -> Self {
        Self {
            chat_room_id: keys::mint_chat_room_id(),
            topic: topic.to_string(),
            creator_user_id: creator_user_id.to_string(),
            participant_user_id: participant_user_id.to_string(),
            last_modified: now,
        }
    }

    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Self> {
        let chat_room_id = identity(store, key, fields::CHATROOM_ID)?;
        Ok(Self {
            topic: required(store, key, fields::TOPIC)?,
            creator_user_id: required(store, key, fields::CREATOR_USER_ID)?,
            participant_user_id: required(store, key, fields::PARTICIPANT_USER_ID)?,
            last_modified: required_millis(store, key, fields::LAST_MODIFIED)?,
            chat_room_id,
        })
    }

    pub fn to_fields(&self) -> Fields {
        Fields::from([
            (fields::CHATROOM_ID.into(), self.chat_room_id.clone()),
            (fields::TOPIC.into(), self.topic.clone()),
            (fields::CREATOR_USER_ID.into(), self.creator_user_id.clone()),
            (fields::PARTICIPANT_USER_ID.into(), self.participant_user_id.clone()),
            (fields::LAST_MODIFIED.into(), self.last_modified.to_string()),
        ])
    }
}

// -- ChatMessage --

#[derive(Debug, Clone)]
pub struct ChatMessageRecord {
    pub chat_message_id: String,
    pub chat_room_id: String,
    pub from_participant_id: String,
    pub message: String,
    pub read_receipt: bool,
    pub last_modified: i64,
}

impl ChatMessageRecord {
    /// A freshly posted message is always unread, whatever the input
    /// claims: the other party cannot have seen it yet.
    pub fn from_input(chat_room_id: &str, from_participant_id: &str, message: &str, now: i64) -> Self {
        Self {
            chat_message_id: keys::mint_chat_message_id(chat_room_id),
            chat_room_id: chat_room_id.to_string(),
            from_participant_id: from_participant_id.to_string(),
            message: message.to_string(),
            read_receipt: false,
            last_modified: now,
        }
    }

    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Self> {
        let chat_message_id = identity(store, key, fields::CHATMESSAGE_ID)?;
        Ok(Self {
            chat_room_id: required(store, key, fields::CHATROOM_ID)?,
            from_participant_id: required(store, key, fields::FROM_PARTICIPANT_ID)?,
            message: required(store, key, fields::MESSAGE)?,
            read_receipt: required_bool(store, key, fields::READ_RECEIPT)?,
            last_modified: required_millis(store, key, fields::LAST_MODIFIED)?,
            chat_message_id,
        })
    }

    pub fn to_fields(&self) -> Fields {
        Fields::from([
            (fields::CHATMESSAGE_ID.into(), self.chat_message_id.clone()),
            (fields::CHATROOM_ID.into(), self.chat_room_id.clone()),
            (fields::FROM_PARTICIPANT_ID.into(), self.from_participant_id.clone()),
            (fields::MESSAGE.into(), self.message.clone()),
            (fields::READ_RECEIPT.into(), self.read_receipt.to_string()),
            (fields::LAST_MODIFIED.into(), self.last_modified.to_string()),
        ])
    }

    /// Monotonic read-receipt guard: once read, a message stays read.
    /// Returns whether the stored value actually changed.
    pub fn apply_read_receipt(&mut self, requested: bool) -> bool {
        if self.read_receipt || self.read_receipt == requested {
            return false;
        }
        self.read_receipt = requested;
        true
    }

    pub fn into_resource(self) -> ChatMessage {
        ChatMessage {
            chat_message_id: self.chat_message_id,
            chat_room_id: self.chat_room_id,
            from_participant_id: self.from_participant_id,
            message: self.message,
            last_modified: self.last_modified,
            read_receipt: self.read_receipt,
            next_action_links: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_store::MemoryStore;

    #[test]
    fn absent_key_is_not_found_not_corrupt() {
        let store = MemoryStore::new();
        match UserRecord::load(&store, "USER:missing") {
            Err(ServiceError::NotFound(key)) => assert_eq!(key, "USER:missing"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_field_is_corrupt() {
        let store = MemoryStore::new();
        let mut record_fields = Fields::new();
        record_fields.insert(fields::CHATROOM_ID.into(), "CHATROOM:r".into());
        record_fields.insert(fields::TOPIC.into(), "t".into());
        // no chatroomcreatoruserid
        store.put("CHATROOM:r", record_fields).unwrap();

        match ChatRoomRecord::load(&store, "CHATROOM:r") {
            Err(ServiceError::CorruptRecord { key, field }) => {
                assert_eq!(key, "CHATROOM:r");
                assert_eq!(field, fields::CREATOR_USER_ID);
            }
            other => panic!("expected CorruptRecord, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_timestamp_is_corrupt() {
        let store = MemoryStore::new();
        let record = ChatMessageRecord::from_input("CHATROOM:r", "USER:a", "hi", 5);
        let key = record.chat_message_id.clone();
        store.put(&key, record.to_fields()).unwrap();
        store.put(&key, Fields::from([(fields::LAST_MODIFIED.to_string(), "soon".to_string())])).unwrap();

        match ChatMessageRecord::load(&store, &key) {
            Err(ServiceError::CorruptRecord { field, .. }) => {
                assert_eq!(field, fields::LAST_MODIFIED);
            }
            other => panic!("expected CorruptRecord, got {other:?}"),
        }
    }

    #[test]
    fn read_receipt_never_regresses() {
        let mut record = ChatMessageRecord::from_input("CHATROOM:r", "USER:a", "hi", 5);
        assert!(!record.read_receipt);

        assert!(!record.apply_read_receipt(false)); // no-op
        assert!(record.apply_read_receipt(true));
        assert!(record.read_receipt);

        assert!(!record.apply_read_receipt(false)); // regression request ignored
        assert!(record.read_receipt);
        assert!(!record.apply_read_receipt(true)); // already read
    }
}
