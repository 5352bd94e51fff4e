use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use parley_types::api::{PostChatMessageRequest, UpdateChatMessageRequest};
use parley_types::links::{self, ActionLink};
use parley_types::models::ChatMessage;

use crate::{SharedState, blocking};

fn with_actions(mut message: ChatMessage) -> ChatMessage {
    let href = links::chat_message(&message.chat_room_id, &message.chat_message_id);
    message.next_action_links = vec![
        ActionLink::self_link(href.clone()),
        ActionLink::new(href, "set-read-receipt", "PUT"),
    ];
    message
}

pub async fn list_chat_messages(
    State(state): State<SharedState>,
    Path(chat_room_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.messages.clone();
    let all = blocking(move || messages.list_for_room(&chat_room_id)).await?;
    Ok(Json(all))
}

pub async fn post_chat_message(
    State(state): State<SharedState>,
    Path(chat_room_id): Path<String>,
    Json(req): Json<PostChatMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.messages.clone();
    let message = blocking(move || messages.create(&chat_room_id, &req)).await?;
    Ok((StatusCode::CREATED, Json(with_actions(message))))
}

/// The message id in the path is the full store key; the room segment is
/// part of the resource path shape but carries no extra information.
pub async fn retrieve_chat_message(
    State(state): State<SharedState>,
    Path((_chat_room_id, message_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.messages.clone();
    let message = blocking(move || messages.retrieve(&message_id)).await?;
    Ok(Json(with_actions(message)))
}

pub async fn update_chat_message(
    State(state): State<SharedState>,
    Path((_chat_room_id, message_id)): Path<(String, String)>,
    Json(req): Json<UpdateChatMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.messages.clone();
    let message = blocking(move || messages.update(&message_id, &req)).await?;
    Ok(Json(with_actions(message)))
}
