use netherald_types::{Guild, User};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::Database;
use crate::error::{DbError, Entity, Result};
use crate::models::{GuildRow, UserRow};

pub const DEFAULT_GUILD_DESCRIPTION: &str = "A netherald guild";

/// Stored in `users.guild` for a user without a guild.
pub const NO_GUILD: i64 = 0;

impl Database {
    // -- Guilds --

    /// Loads a guild with its members as identifier-only users.
    pub fn get_guild(&self, id: i64) -> Result<Guild> {
        self.with_conn(|conn| load_guild(conn, id))
    }

    /// Creates a guild owned by `owner`, who is also its only member.
    /// Returns the new guild id.
    pub fn init_guild(&self, name: &str, owner: Uuid) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO guilds (name, description, users, owner) VALUES (?1, ?2, ?3, ?4)",
                params![
                    name,
                    DEFAULT_GUILD_DESCRIPTION,
                    encode_uuid_list(&[owner]),
                    owner.to_string()
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!(guild_id = id, %owner, "Created guild {:?}", name);
            Ok(id)
        })
    }

    // -- Users --

    /// Loads a user with its guild fully resolved and its friends resolved
    /// one level deep: each friend carries its guild but no friends.
    pub fn get_user(&self, uuid: Uuid) -> Result<User> {
        self.with_conn(|conn| load_user(conn, uuid))
    }

    /// Creates a user with no guild and no friends.
    pub fn init_user(&self, uuid: Uuid) -> Result<()> {
        self.create_user(uuid, None, &[])
    }

    /// Fails with `NotFound` if `guild` names a guild that does not exist.
    pub fn create_user(&self, uuid: Uuid, guild: Option<i64>, friends: &[Uuid]) -> Result<()> {
        self.with_conn(|conn| {
            if let Some(id) = guild {
                if query_guild_row(conn, id)?.is_none() {
                    return Err(DbError::NotFound(Entity::Guild(id)));
                }
            }

            let inserted = conn.execute(
                "INSERT INTO users (uuid, guild, friends) VALUES (?1, ?2, ?3)",
                params![uuid.to_string(), guild.unwrap_or(NO_GUILD), encode_uuid_list(friends)],
            );

            match inserted {
                Ok(_) => {
                    info!(%uuid, guild = guild.unwrap_or(NO_GUILD), "Created user");
                    Ok(())
                }
                Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                    Err(DbError::AlreadyExists(uuid))
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}

fn load_guild(conn: &Connection, id: i64) -> Result<Guild> {
    debug!(guild_id = id, "Loading guild");
    let row = query_guild_row(conn, id)?.ok_or(DbError::NotFound(Entity::Guild(id)))?;

    // Members stay identifier-only so guild -> user -> guild never cycles.
    let users = decode_uuid_list("guilds.users", row.users.as_deref())?
        .into_iter()
        .map(User::shallow)
        .collect();

    let owner = row
        .owner
        .as_deref()
        .map(|raw| parse_uuid("guilds.owner", raw))
        .transpose()?;

    Ok(Guild {
        id: row.id,
        name: row.name,
        description: row.description,
        users,
        owner,
    })
}

fn load_user(conn: &Connection, uuid: Uuid) -> Result<User> {
    debug!(%uuid, "Loading user");
    let row = query_user_row(conn, uuid)?.ok_or(DbError::NotFound(Entity::User(uuid)))?;

    let friends = decode_uuid_list("users.friends", row.friends.as_deref())?
        .into_iter()
        .map(|friend| load_user_without_friends(conn, friend))
        .collect::<Result<Vec<_>>>()?;

    Ok(User {
        uuid,
        guild: load_guild_ref(conn, row.guild)?,
        friends: Some(friends),
    })
}

fn load_user_without_friends(conn: &Connection, uuid: Uuid) -> Result<User> {
    let row = query_user_row(conn, uuid)?.ok_or(DbError::NotFound(Entity::User(uuid)))?;

    Ok(User {
        uuid,
        guild: load_guild_ref(conn, row.guild)?,
        friends: None,
    })
}

fn load_guild_ref(conn: &Connection, guild: i64) -> Result<Option<Box<Guild>>> {
    if guild == NO_GUILD {
        return Ok(None);
    }
    Ok(Some(Box::new(load_guild(conn, guild)?)))
}

fn query_guild_row(conn: &Connection, id: i64) -> Result<Option<GuildRow>> {
    let mut stmt =
        conn.prepare("SELECT id, name, description, users, owner FROM guilds WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(GuildRow {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                users: row.get(3)?,
                owner: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_row(conn: &Connection, uuid: Uuid) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT guild, friends FROM users WHERE uuid = ?1")?;

    let row = stmt
        .query_row([uuid.to_string()], |row| {
            Ok(UserRow {
                guild: row.get::<_, Option<i64>>(0)?.unwrap_or(NO_GUILD),
                friends: row.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// A NULL list column reads as an empty list.
fn decode_uuid_list(column: &'static str, raw: Option<&str>) -> Result<Vec<Uuid>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let ids: Vec<String> = serde_json::from_str(raw).map_err(|e| DbError::Corrupt {
        column,
        reason: e.to_string(),
    })?;

    ids.iter().map(|id| parse_uuid(column, id)).collect()
}

fn encode_uuid_list(ids: &[Uuid]) -> String {
    let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
    serde_json::Value::from(ids).to_string()
}

fn parse_uuid(column: &'static str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DbError::Corrupt {
        column,
        reason: format!("{:?} is not a UUID: {}", raw, e),
    })
}
