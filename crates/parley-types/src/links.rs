//! Canonical resource paths and the action-link affordances attached to
//! single-resource responses. Path shapes are a public contract; polling
//! clients follow these links verbatim for their follow-up reads.

use serde::{Deserialize, Serialize};

pub fn user(user_id: &str) -> String {
    format!("/users/{user_id}")
}

pub fn chat_room(chat_room_id: &str) -> String {
    format!("/chatrooms/{chat_room_id}")
}

pub fn chat_messages(chat_room_id: &str) -> String {
    format!("/chatrooms/{chat_room_id}/chatmessages")
}

pub fn chat_message(chat_room_id: &str, chat_message_id: &str) -> String {
    format!("/chatrooms/{chat_room_id}/chatmessages/{chat_message_id}")
}

/// A next-allowable-action hyperlink, PayPal-HATEOAS style:
/// `{ "href": "/chatrooms/CHATROOM:..", "rel": "self", "method": "GET" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLink {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl ActionLink {
    pub fn new(href: String, rel: &str, method: &str) -> Self {
        Self {
            href,
            rel: rel.to_string(),
            method: method.to_string(),
        }
    }

    /// `self` link for any resource path.
    pub fn self_link(href: String) -> Self {
        Self::new(href, "self", "GET")
    }
}
