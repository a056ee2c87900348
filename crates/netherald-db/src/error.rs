use std::fmt;

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, DbError>;

/// The record a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Guild(i64),
    User(Uuid),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guild(id) => write!(f, "guild {}", id),
            Self::User(uuid) => write!(f, "user {}", uuid),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to connect to {location}: {reason}")]
    Connection { location: String, reason: String },

    #[error("SQL connection is closed")]
    ConnectionClosed,

    #[error("no {0} found")]
    NotFound(Entity),

    #[error("user {0} already exists")]
    AlreadyExists(Uuid),

    /// A JSON list column held something other than an array of UUID strings.
    #[error("corrupt {column} column: {reason}")]
    Corrupt { column: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
