use std::sync::Arc;

use parley_store::{KeyValueStore, keys};
use parley_types::api::PostChatMessageRequest;
use parley_types::models::Notification;
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::messages::ChatMessageRepository;
use crate::records::{fields, required_millis};
use crate::rooms::ChatRoomRepository;

/// Polling-based change discovery. Stateless between calls; the only
/// cursor is the watermark the client sends back. Clients get pointers,
/// not payloads, and perform their own follow-up reads. By the time they
/// do, the state may have moved again; polling accepts that.
#[derive(Clone)]
pub struct NotificationEngine {
    store: Arc<dyn KeyValueStore>,
    rooms: ChatRoomRepository,
    messages: ChatMessageRepository,
}

impl NotificationEngine {
    pub fn new(store: Arc<dyn KeyValueStore>, rooms: ChatRoomRepository, messages: ChatMessageRepository) -> Self {
        Self { store, rooms, messages }
    }

    /// One notification per record, of any kind, modified after `since`.
    /// Never blocks, never pushes; an empty result is a normal answer.
    pub fn check_for_new_events(&self, since: i64) -> Result<Vec<Notification>> {
        let mut notifications = Vec::new();

        for key in self.store.scan_keys(keys::USER_PREFIX)? {
            if let Some(timestamp) = self.modified_after(&key, since)? {
                notifications.push(Notification::user(key, timestamp));
            }
        }

        for key in self.store.scan_keys(keys::CHATROOM_PREFIX)? {
            if let Some(timestamp) = self.modified_after(&key, since)? {
                notifications.push(Notification::chat_room(key, timestamp));
            }
        }

        for key in self.store.scan_keys(keys::MESSAGE_PREFIX)? {
            if let Some(timestamp) = self.modified_after(&key, since)? {
                let chat_room_id = keys::chat_room_of_message(&key)
                    .ok_or_else(|| ServiceError::CorruptRecord {
                        key: key.clone(),
                        field: fields::CHATROOM_ID.to_string(),
                    })?
                    .to_string();
                notifications.push(Notification::chat_message(chat_room_id, key, timestamp));
            }
        }

        info!("poll since {since}: {} notification(s)", notifications.len());
        Ok(notifications)
    }

    fn modified_after(&self, key: &str, since: i64) -> Result<Option<i64>> {
        let modified = required_millis(self.store.as_ref(), key, fields::LAST_MODIFIED)?;
        Ok((modified > since).then_some(modified))
    }

    /// Demo affordance: manufacture `count` messages in the named room,
    /// attributed to its first stored participant, and hand back the
    /// notifications a real poll would have produced for them.
    pub fn simulate_activity(&self, chat_room_id: &str, count: u32) -> Result<Vec<Notification>> {
        let room = self.rooms.retrieve(chat_room_id)?;
        let from_participant_id = room.participants[0].user_id.clone();

        info!("simulating {count} message(s) in {chat_room_id} from {from_participant_id}");

        let mut notifications = Vec::with_capacity(count as usize);
        for i in 0..count {
            let req = PostChatMessageRequest {
                from_participant_id: from_participant_id.clone(),
                message: format!("Test message {i} for chat room {chat_room_id}"),
                ..Default::default()
            };
            let message = self.messages.create(chat_room_id, &req)?;
            notifications.push(Notification::chat_message(
                message.chat_room_id,
                message.chat_message_id,
                message.last_modified,
            ));
        }
        Ok(notifications)
    }
}
