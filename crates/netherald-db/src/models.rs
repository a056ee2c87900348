//! Database row types. These map directly to SQLite rows and keep the JSON
//! list columns as raw text; resolving them into netherald-types records
//! happens in `queries`.

pub struct UserRow {
    /// 0 means no guild.
    pub guild: i64,
    pub friends: Option<String>,
}

pub struct GuildRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub users: Option<String>,
    pub owner: Option<String>,
}
