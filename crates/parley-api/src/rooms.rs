use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use parley_types::api::{CreateChatRoomRequest, UpdateChatRoomRequest};
use parley_types::links::{self, ActionLink};
use parley_types::models::ChatRoom;

use crate::{SharedState, blocking};

/// Next-allowable-action affordances for one room: read it again, change
/// the topic, post into it, or poll for changes.
fn with_actions(mut room: ChatRoom) -> ChatRoom {
    let href = links::chat_room(&room.chat_room_id);
    room.next_action_links = vec![
        ActionLink::self_link(href.clone()),
        ActionLink::new(href, "update-topic", "PUT"),
        ActionLink::new(links::chat_messages(&room.chat_room_id), "post-message", "POST"),
        ActionLink::new("/notifications".to_string(), "poll", "GET"),
    ];
    room
}

pub async fn list_chat_rooms(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, StatusCode> {
    let rooms = state.rooms.clone();
    let all = blocking(move || rooms.list_all()).await?;
    Ok(Json(all))
}

pub async fn create_chat_room(
    State(state): State<SharedState>,
    Json(req): Json<CreateChatRoomRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let rooms = state.rooms.clone();
    let room = blocking(move || rooms.create(&req)).await?;
    Ok((StatusCode::CREATED, Json(with_actions(room))))
}

pub async fn retrieve_chat_room(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let rooms = state.rooms.clone();
    let room = blocking(move || rooms.retrieve(&id)).await?;
    Ok(Json(with_actions(room)))
}

pub async fn update_chat_room(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateChatRoomRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let rooms = state.rooms.clone();
    let room = blocking(move || rooms.update(&id, &req)).await?;
    Ok(Json(with_actions(room)))
}
