use std::fmt;

use crate::error::{DbError, Result};

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_HOST: &str = "netherald.db";
pub const MEMORY_HOST: &str = ":memory:";

/// Connection parameters.
///
/// `host` names the database location: a SQLite file path, or `:memory:`.
/// `port` is kept for the connection banner only.
#[derive(Clone)]
pub struct DbConfig {
    pub username: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    /// Create the tables on connect if they are missing.
    pub create_schema: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            username: "root".into(),
            password: None,
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            create_schema: true,
        }
    }
}

impl DbConfig {
    /// An empty password means no password.
    pub fn new(username: &str, password: &str, host: &str) -> Self {
        Self {
            username: username.to_string(),
            password: (!password.is_empty()).then(|| password.to_string()),
            host: host.to_string(),
            ..Self::default()
        }
    }

    pub fn in_memory(username: &str) -> Self {
        Self::new(username, "", MEMORY_HOST)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_create_schema(mut self, create_schema: bool) -> Self {
        self.create_schema = create_schema;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.host == MEMORY_HOST
    }

    /// Reads `NETHERALD_DB_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let username = lookup("NETHERALD_DB_USER").unwrap_or(defaults.username);
        let password = lookup("NETHERALD_DB_PASSWORD").unwrap_or_default();
        let host = lookup("NETHERALD_DB_HOST").unwrap_or(defaults.host);

        let port = match lookup("NETHERALD_DB_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| DbError::Config(format!("NETHERALD_DB_PORT is not a port: {:?}", raw)))?,
            None => defaults.port,
        };

        let create_schema = match lookup("NETHERALD_DB_CREATE_SCHEMA").as_deref() {
            None => defaults.create_schema,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                return Err(DbError::Config(format!(
                    "NETHERALD_DB_CREATE_SCHEMA must be true or false, got {:?}",
                    other
                )));
            }
        };

        Ok(Self::new(&username, &password, &host)
            .with_port(port)
            .with_create_schema(create_schema))
    }
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("create_schema", &self.create_schema)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_password_means_none() {
        assert_eq!(DbConfig::new("steve", "", "x.db").password, None);
        assert_eq!(
            DbConfig::new("steve", "hunter2", "x.db").password.as_deref(),
            Some("hunter2")
        );
    }

    #[test]
    fn env_defaults() {
        let config = DbConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.username, "root");
        assert_eq!(config.password, None);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, 3306);
        assert!(config.create_schema);
    }

    #[test]
    fn env_overrides() {
        let config = DbConfig::from_lookup(lookup_from(&[
            ("NETHERALD_DB_USER", "admin"),
            ("NETHERALD_DB_PASSWORD", "pw"),
            ("NETHERALD_DB_HOST", ":memory:"),
            ("NETHERALD_DB_PORT", "3307"),
            ("NETHERALD_DB_CREATE_SCHEMA", "false"),
        ]))
        .unwrap();

        assert_eq!(config.username, "admin");
        assert_eq!(config.password.as_deref(), Some("pw"));
        assert!(config.is_in_memory());
        assert_eq!(config.port, 3307);
        assert!(!config.create_schema);
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let err = DbConfig::from_lookup(lookup_from(&[("NETHERALD_DB_PORT", "mysql")])).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", DbConfig::new("steve", "hunter2", "x.db"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
