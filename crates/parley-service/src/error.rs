use parley_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures a repository operation can surface to its caller.
///
/// Attempted edits of immutable fields are deliberately NOT represented
/// here: they are recovered locally by dropping the offending field (with
/// a warning), so the operation still succeeds.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A lookup by id found no record under that key.
    #[error("no record stored under {0}")]
    NotFound(String),

    /// A stored record is missing (or holds an unreadable value for) a
    /// required field. Fatal to the operation; never silently defaulted.
    #[error("record {key} is missing required field `{field}`")]
    CorruptRecord { key: String, field: String },

    /// Composite resolution found a room referencing a participant with no
    /// stored record. A room with an unresolved participant is meaningless,
    /// so this surfaces instead of being masked.
    #[error("chat room {room} references participant {user} with no stored record")]
    IntegrityFault { room: String, user: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
