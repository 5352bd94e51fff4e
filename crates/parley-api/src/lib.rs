pub mod messages;
pub mod notifications;
pub mod rooms;
pub mod users;

use axum::http::StatusCode;
use parley_service::{
    ChatMessageRepository, ChatRoomRepository, NotificationEngine, ServiceError, UserRepository,
};
use tracing::{error, warn};

/// Everything the handlers need, threaded through axum state.
pub struct AppState {
    pub users: UserRepository,
    pub rooms: ChatRoomRepository,
    pub messages: ChatMessageRepository,
    pub notifications: NotificationEngine,
}

pub type SharedState = std::sync::Arc<AppState>;

/// Run a synchronous repository call off the async runtime. The store is
/// blocking (SQLite), so handlers must not touch it on a worker thread.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, StatusCode>
where
    F: FnOnce() -> parley_service::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(status_for)
}

pub(crate) fn status_for(err: ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound(_) => {
            warn!("{err}");
            StatusCode::NOT_FOUND
        }
        ServiceError::CorruptRecord { .. }
        | ServiceError::IntegrityFault { .. }
        | ServiceError::Store(_) => {
            error!("{err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
