use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player record.
///
/// `guild` is `None` when the user belongs to no guild *or* when the loader
/// did not resolve it (guild members are loaded identifier-only).
/// `friends` is `None` when friends were not loaded at all, which is how
/// friend resolution is cut off after one level; `Some(vec![])` means the
/// user has no friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uuid: Uuid,
    pub guild: Option<Box<Guild>>,
    pub friends: Option<Vec<User>>,
}

impl User {
    /// A user known only by identifier.
    pub fn shallow(uuid: Uuid) -> Self {
        Self {
            uuid,
            guild: None,
            friends: None,
        }
    }

    pub fn guild_id(&self) -> Option<i64> {
        self.guild.as_ref().map(|g| g.id)
    }

    /// Identifiers of the loaded friends, empty if friends were not loaded.
    pub fn friend_ids(&self) -> Vec<Uuid> {
        self.friends
            .as_deref()
            .map(|friends| friends.iter().map(|f| f.uuid).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Members in stored order, identifier-only.
    pub users: Vec<User>,
    pub owner: Option<Uuid>,
}

impl Guild {
    pub fn member_ids(&self) -> Vec<Uuid> {
        self.users.iter().map(|u| u.uuid).collect()
    }

    pub fn has_member(&self, uuid: Uuid) -> bool {
        self.users.iter().any(|u| u.uuid == uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild_with(members: &[Uuid]) -> Guild {
        Guild {
            id: 7,
            name: "Ravens".into(),
            description: "A netherald guild".into(),
            users: members.iter().copied().map(User::shallow).collect(),
            owner: members.first().copied(),
        }
    }

    #[test]
    fn shallow_user_has_nothing_resolved() {
        let id = Uuid::new_v4();
        let user = User::shallow(id);
        assert_eq!(user.uuid, id);
        assert!(user.guild.is_none());
        assert!(user.friends.is_none());
        assert!(user.friend_ids().is_empty());
    }

    #[test]
    fn guild_membership_helpers() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let guild = guild_with(&[a, b]);

        assert_eq!(guild.member_ids(), vec![a, b]);
        assert!(guild.has_member(b));
        assert!(!guild.has_member(Uuid::new_v4()));
    }

    #[test]
    fn unloaded_friends_serialize_as_null() {
        let id = Uuid::new_v4();
        let mut user = User::shallow(id);
        user.guild = Some(Box::new(guild_with(&[id])));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["uuid"], id.to_string());
        assert!(json["friends"].is_null());
        assert_eq!(json["guild"]["id"], 7);
        assert_eq!(json["guild"]["users"][0]["uuid"], id.to_string());
        assert_eq!(user.guild_id(), Some(7));
    }
}
