pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod schema;

pub use config::DbConfig;
pub use error::{DbError, Entity, Result};

use rusqlite::Connection;
use tracing::{info, warn};

/// One connection to the netherald store.
///
/// There is no internal locking: callers serialize access or open one
/// `Database` per concurrent caller. Once `close` has run, every operation
/// returns `DbError::ConnectionClosed`.
pub struct Database {
    conn: Option<Connection>,
    location: String,
}

impl Database {
    pub fn connect(config: &DbConfig) -> Result<Self> {
        let location = format!("{}:{}", config.host, config.port);

        if config.username.is_empty() {
            return Err(DbError::Connection {
                location,
                reason: "credentials rejected: empty username".into(),
            });
        }

        info!(user = %config.username, "Connecting to {}", location);
        let opened = if config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.host)
        };
        let conn = opened.map_err(|e| DbError::Connection {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        if config.create_schema {
            schema::ensure(&conn)?;
        }

        info!("Connected to {}", location);
        Ok(Self {
            conn: Some(conn),
            location,
        })
    }

    /// Releases the connection. Close failures are logged, not returned.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        match conn.close() {
            Ok(()) => info!("Closed connection to {}", self.location),
            Err((_, e)) => warn!("Error while closing connection to {}: {}", self.location, e),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.as_ref().ok_or(DbError::ConnectionClosed)?;
        f(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_username_is_rejected() {
        let err = Database::connect(&DbConfig::in_memory("")).err().unwrap();
        assert!(matches!(err, DbError::Connection { .. }));
    }

    #[test]
    fn unopenable_location_is_a_connection_error() {
        let missing_dir = std::env::temp_dir()
            .join("netherald_no_such_dir")
            .join("nested")
            .join("store.db");
        let config = DbConfig::new("root", "", &missing_dir.to_string_lossy());

        let err = Database::connect(&config).err().unwrap();
        assert!(matches!(err, DbError::Connection { .. }));
    }

    #[test]
    fn close_is_idempotent() {
        let mut db = Database::connect(&DbConfig::in_memory("root")).unwrap();
        assert!(!db.is_closed());
        assert_eq!(db.location(), ":memory::3306");

        db.close();
        db.close();

        assert!(db.is_closed());
        assert!(matches!(
            db.with_conn(|_| Ok(())),
            Err(DbError::ConnectionClosed)
        ));
    }
}
