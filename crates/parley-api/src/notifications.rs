use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use parley_types::api::NotificationQuery;

use crate::{SharedState, blocking};

/// Poll for changes. Two modes:
///
/// - `GET /notifications?since=<millis>` is the real poll: everything
///   modified after the client's watermark. Without `since` the watermark
///   defaults to "now", so a first poll comes back empty and hands the
///   client a baseline to echo on its next call.
/// - `GET /notifications?chatroomID=<id>&test=true&count=<n>` is the demo
///   affordance: manufacture `n` incoming messages in the named room and
///   return their notifications directly.
pub async fn get_notifications(
    State(state): State<SharedState>,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    if query.test {
        let Some(chat_room_id) = query.chatroom_id else {
            warn!("test notifications requested without a chatroomID");
            return Err(StatusCode::BAD_REQUEST);
        };
        let count = query.count.unwrap_or(1);
        let engine = state.notifications.clone();
        let produced = blocking(move || engine.simulate_activity(&chat_room_id, count)).await?;
        return Ok(Json(produced));
    }

    let since = query
        .since
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let engine = state.notifications.clone();
    let notifications = blocking(move || engine.check_for_new_events(since)).await?;
    Ok(Json(notifications))
}
