use std::sync::Arc;

use parley_store::{KeyValueStore, keys};
use parley_types::api::{PostChatMessageRequest, UpdateChatMessageRequest};
use parley_types::models::ChatMessage;
use tracing::{info, warn};

use crate::error::Result;
use crate::records::ChatMessageRecord;

#[derive(Clone)]
pub struct ChatMessageRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ChatMessageRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Post a message into `chat_room_id`. The room named in the request
    /// path is authoritative; a disagreeing body room id is dropped. The
    /// new message is always stored unread.
    pub fn create(&self, chat_room_id: &str, req: &PostChatMessageRequest) -> Result<ChatMessage> {
        if let Some(supplied) = &req.chat_message_id {
            warn!("ignoring client-supplied chatMessageID {supplied} on create");
        }
        if let Some(body_room) = &req.chat_room_id {
            if body_room != chat_room_id {
                warn!("ignoring body chatRoomID {body_room}; the path names {chat_room_id}");
            }
        }
        if req.read_receipt == Some(true) {
            warn!("ignoring readReceipt=true on create; a new message starts unread");
        }

        let record = ChatMessageRecord::from_input(
            chat_room_id,
            &req.from_participant_id,
            &req.message,
            crate::now_millis(),
        );
        info!("posting message {} in {chat_room_id}", record.chat_message_id);
        self.store.put(&record.chat_message_id, record.to_fields())?;

        let stored = ChatMessageRecord::load(self.store.as_ref(), &record.chat_message_id)?;
        Ok(stored.into_resource())
    }

    pub fn retrieve(&self, chat_message_id: &str) -> Result<ChatMessage> {
        Ok(ChatMessageRecord::load(self.store.as_ref(), chat_message_id)?.into_resource())
    }

    /// Set the read receipt; everything else in the input is immutable and
    /// dropped. The receipt is monotonic: a request to go back to unread
    /// succeeds but leaves the stored (read) state untouched, so repeated
    /// identical calls are no-ops after the first.
    pub fn update(&self, chat_message_id: &str, req: &UpdateChatMessageRequest) -> Result<ChatMessage> {
        let mut record = ChatMessageRecord::load(self.store.as_ref(), chat_message_id)?;

        if req.message.is_some() || req.from_participant_id.is_some() {
            warn!("ignoring immutable message fields in update of {chat_message_id}");
        }

        let mut changed = false;
        if let Some(requested) = req.read_receipt {
            changed = record.apply_read_receipt(requested);
        }

        if changed {
            record.last_modified = crate::now_millis();
            self.store.put(chat_message_id, record.to_fields())?;
        }

        let stored = ChatMessageRecord::load(self.store.as_ref(), chat_message_id)?;
        Ok(stored.into_resource())
    }

    /// Every message of one room, via the `MESSAGE:<roomID>:` prefix scan.
    /// Ordered by (lastModified, id) for stable output; the scan itself is
    /// key-ordered and carries no time meaning.
    pub fn list_for_room(&self, chat_room_id: &str) -> Result<Vec<ChatMessage>> {
        let mut messages = Vec::new();
        for key in self.store.scan_keys(&keys::message_scan_prefix(chat_room_id))? {
            messages.push(ChatMessageRecord::load(self.store.as_ref(), &key)?.into_resource());
        }
        messages.sort_by(|a, b| {
            (a.last_modified, &a.chat_message_id).cmp(&(b.last_modified, &b.chat_message_id))
        });
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_store::MemoryStore;

    fn repo() -> ChatMessageRepository {
        ChatMessageRepository::new(Arc::new(MemoryStore::new()))
    }

    fn post_req(from: &str, text: &str) -> PostChatMessageRequest {
        PostChatMessageRequest {
            from_participant_id: from.into(),
            message: text.into(),
            ..Default::default()
        }
    }

    fn receipt_req(read: bool) -> UpdateChatMessageRequest {
        UpdateChatMessageRequest {
            chat_message_id: None,
            from_participant_id: None,
            message: None,
            read_receipt: Some(read),
            last_modified: None,
        }
    }

    #[test]
    fn create_namespaces_the_id_under_the_room_and_starts_unread() {
        let messages = repo();
        let req = PostChatMessageRequest {
            chat_message_id: Some("MESSAGE:forged".into()),
            chat_room_id: Some("CHATROOM:other".into()),
            read_receipt: Some(true),
            last_modified: Some(1),
            ..post_req("USER:a", "hi")
        };

        let created = messages.create("CHATROOM:r", &req).unwrap();
        assert!(created.chat_message_id.starts_with("MESSAGE:CHATROOM:r:"));
        assert_eq!(created.chat_room_id, "CHATROOM:r");
        assert!(!created.read_receipt);
        assert_ne!(created.last_modified, 1);

        let fetched = messages.retrieve(&created.chat_message_id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn read_receipt_is_monotonic_and_update_is_idempotent() {
        let messages = repo();
        let created = messages.create("CHATROOM:r", &post_req("USER:a", "hi")).unwrap();

        let read = messages.update(&created.chat_message_id, &receipt_req(true)).unwrap();
        assert!(read.read_receipt);

        // regression request: succeeds, state unchanged
        let still_read = messages.update(&created.chat_message_id, &receipt_req(false)).unwrap();
        assert!(still_read.read_receipt);
        assert_eq!(still_read, read);

        // repeated identical input: no further effect
        let again = messages.update(&created.chat_message_id, &receipt_req(true)).unwrap();
        assert_eq!(again, read);
        assert_eq!(messages.retrieve(&created.chat_message_id).unwrap(), read);
    }

    #[test]
    fn update_drops_immutable_fields_silently() {
        let messages = repo();
        let created = messages.create("CHATROOM:r", &post_req("USER:a", "hi")).unwrap();

        let updated = messages
            .update(
                &created.chat_message_id,
                &UpdateChatMessageRequest {
                    chat_message_id: None,
                    from_participant_id: Some("USER:b".into()),
                    message: Some("rewritten".into()),
                    read_receipt: None,
                    last_modified: Some(42),
                },
            )
            .unwrap();

        assert_eq!(updated.message, "hi");
        assert_eq!(updated.from_participant_id, "USER:a");
        assert_eq!(updated, created);
    }

    #[test]
    fn listing_is_scoped_to_one_room() {
        let messages = repo();
        messages.create("CHATROOM:a", &post_req("USER:a", "one")).unwrap();
        messages.create("CHATROOM:a", &post_req("USER:b", "two")).unwrap();
        messages.create("CHATROOM:b", &post_req("USER:a", "elsewhere")).unwrap();

        let in_a = messages.list_for_room("CHATROOM:a").unwrap();
        assert_eq!(in_a.len(), 2);
        assert!(in_a.iter().all(|m| m.chat_room_id == "CHATROOM:a"));

        assert_eq!(messages.list_for_room("CHATROOM:b").unwrap().len(), 1);
        assert!(messages.list_for_room("CHATROOM:c").unwrap().is_empty());
    }
}
