//! Identifier scheme. Every resource id doubles as its store key:
//!
//! - `USER:<uuid>`
//! - `CHATROOM:<uuid>`
//! - `MESSAGE:<chatRoomID>:<uuid>`
//!
//! Message ids are scoped by their owning room so that a single prefix
//! scan for `MESSAGE:<chatRoomID>:` enumerates exactly that room's
//! messages. The shape is a public contract relied on by clients and any
//! downstream tooling that scans the store.

use uuid::Uuid;

pub const USER_PREFIX: &str = "USER:";
pub const CHATROOM_PREFIX: &str = "CHATROOM:";
pub const MESSAGE_PREFIX: &str = "MESSAGE:";

pub fn mint_user_id() -> String {
    format!("{USER_PREFIX}{}", Uuid::new_v4())
}

pub fn mint_chat_room_id() -> String {
    format!("{CHATROOM_PREFIX}{}", Uuid::new_v4())
}

pub fn mint_chat_message_id(chat_room_id: &str) -> String {
    format!("{MESSAGE_PREFIX}{chat_room_id}:{}", Uuid::new_v4())
}

/// The scan prefix covering all of one room's messages. The trailing
/// colon matters: without it, `CHATROOM:ab` would also match rooms whose
/// id merely starts with `ab`.
pub fn message_scan_prefix(chat_room_id: &str) -> String {
    format!("{MESSAGE_PREFIX}{chat_room_id}:")
}

/// Recover the owning room id from a message key. The room id itself
/// contains colons, so the random suffix is split off from the right.
pub fn chat_room_of_message(chat_message_id: &str) -> Option<&str> {
    let scoped = chat_message_id.strip_prefix(MESSAGE_PREFIX)?;
    let cut = scoped.rfind(':')?;
    Some(&scoped[..cut])
}
