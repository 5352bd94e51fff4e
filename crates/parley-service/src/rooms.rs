use std::sync::Arc;

use parley_store::{KeyValueStore, keys};
use parley_types::api::{CreateChatRoomRequest, UpdateChatRoomRequest};
use parley_types::models::{ChatRoom, User};
use tracing::{info, warn};

use crate::error::{Result, ServiceError};
use crate::messages::ChatMessageRepository;
use crate::records::ChatRoomRecord;
use crate::users::UserRepository;

#[derive(Clone)]
pub struct ChatRoomRepository {
    store: Arc<dyn KeyValueStore>,
    users: UserRepository,
    messages: ChatMessageRepository,
}

impl ChatRoomRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, users: UserRepository, messages: ChatMessageRepository) -> Self {
        Self { store, users, messages }
    }

    /// Create a room between the two named participants (creator first).
    /// Participants are not pre-validated here; the room record stores
    /// ids only, and the resolution building the returned value surfaces
    /// an `IntegrityFault` if one of them has no record.
    pub fn create(&self, req: &CreateChatRoomRequest) -> Result<ChatRoom> {
        if let Some(supplied) = &req.chat_room_id {
            warn!("ignoring client-supplied chatRoomID {supplied} on create");
        }

        let [creator, participant] = &req.participants;
        let record = ChatRoomRecord::from_input(
            &req.topic,
            &creator.user_id,
            &participant.user_id,
            crate::now_millis(),
        );
        info!("creating chat room {} for {} and {}", record.chat_room_id, creator.user_id, participant.user_id);
        self.store.put(&record.chat_room_id, record.to_fields())?;

        let stored = ChatRoomRecord::load(self.store.as_ref(), &record.chat_room_id)?;
        self.resolve(stored)
    }

    pub fn retrieve(&self, chat_room_id: &str) -> Result<ChatRoom> {
        let record = ChatRoomRecord::load(self.store.as_ref(), chat_room_id)?;
        self.resolve(record)
    }

    /// Overwrite the topic; every other field in the input is immutable
    /// and dropped. No write happens when nothing effectively changes.
    pub fn update(&self, chat_room_id: &str, req: &UpdateChatRoomRequest) -> Result<ChatRoom> {
        let mut record = ChatRoomRecord::load(self.store.as_ref(), chat_room_id)?;

        let mut changed = false;
        if let Some(topic) = &req.topic {
            if *topic != record.topic {
                record.topic = topic.clone();
                changed = true;
            }
        }

        if changed {
            record.last_modified = crate::now_millis();
            self.store.put(chat_room_id, record.to_fields())?;
        }

        let stored = ChatRoomRecord::load(self.store.as_ref(), chat_room_id)?;
        self.resolve(stored)
    }

    /// Full scan of the CHATROOM keyspace, each room fully resolved.
    pub fn list_all(&self) -> Result<Vec<ChatRoom>> {
        let mut rooms = Vec::new();
        for key in self.store.scan_keys(keys::CHATROOM_PREFIX)? {
            let record = ChatRoomRecord::load(self.store.as_ref(), &key)?;
            rooms.push(self.resolve(record)?);
        }
        Ok(rooms)
    }

    /// Assemble the composite resource: the room record plus its two
    /// participant Users and its message list, each fetched by id through
    /// the owning repository. The reads are independent, with no snapshot
    /// isolation, so a concurrent writer can produce a torn view; that is
    /// accepted behavior here.
    fn resolve(&self, record: ChatRoomRecord) -> Result<ChatRoom> {
        let creator = self.participant(&record.chat_room_id, &record.creator_user_id)?;
        let participant = self.participant(&record.chat_room_id, &record.participant_user_id)?;
        let chat_messages = self.messages.list_for_room(&record.chat_room_id)?;

        Ok(ChatRoom {
            chat_room_id: record.chat_room_id,
            topic: record.topic,
            participants: vec![creator, participant],
            chat_messages,
            next_action_links: Vec::new(),
        })
    }

    fn participant(&self, chat_room_id: &str, user_id: &str) -> Result<User> {
        match self.users.retrieve(user_id) {
            Err(ServiceError::NotFound(user)) => Err(ServiceError::IntegrityFault {
                room: chat_room_id.to_string(),
                user,
            }),
            other => other,
        }
    }
}
