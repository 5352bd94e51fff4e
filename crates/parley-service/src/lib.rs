pub mod error;
pub mod messages;
pub mod notifications;
pub mod records;
pub mod rooms;
pub mod users;

pub use error::{Result, ServiceError};
pub use messages::ChatMessageRepository;
pub use notifications::NotificationEngine;
pub use rooms::ChatRoomRepository;
pub use users::UserRepository;

/// The record clock. Millis since the epoch, stamped server-side on every
/// create and effective update.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
