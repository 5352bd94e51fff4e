use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use parley_api::{AppState, SharedState, messages, notifications, rooms, users};
use parley_service::{
    ChatMessageRepository, ChatRoomRepository, NotificationEngine, UserRepository,
};
use parley_store::{KeyValueStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("PARLEY_DB_PATH").unwrap_or_else(|_| "parley.db".into());
    let host = std::env::var("PARLEY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PARLEY_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // The store handle is an explicit capability threaded through the
    // repository constructors, never ambient state.
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&PathBuf::from(&db_path))?);

    let user_repo = UserRepository::new(store.clone());
    let message_repo = ChatMessageRepository::new(store.clone());
    let room_repo = ChatRoomRepository::new(store.clone(), user_repo.clone(), message_repo.clone());
    let notification_engine =
        NotificationEngine::new(store, room_repo.clone(), message_repo.clone());

    let state: SharedState = Arc::new(AppState {
        users: user_repo,
        rooms: room_repo,
        messages: message_repo,
        notifications: notification_engine,
    });

    // Routes
    let app = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::retrieve_user).put(users::update_user))
        .route("/chatrooms", get(rooms::list_chat_rooms).post(rooms::create_chat_room))
        .route("/chatrooms/{id}", get(rooms::retrieve_chat_room).put(rooms::update_chat_room))
        .route(
            "/chatrooms/{id}/chatmessages",
            get(messages::list_chat_messages).post(messages::post_chat_message),
        )
        .route(
            "/chatrooms/{id}/chatmessages/{message_id}",
            get(messages::retrieve_chat_message).put(messages::update_chat_message),
        )
        .route("/notifications", get(notifications::get_notifications))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Parley server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
