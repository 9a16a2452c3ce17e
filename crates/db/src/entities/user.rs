//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub username: String,

    pub username_lower: String,

    /// NULL = local user, Some(host) = remote user
    #[sea_orm(nullable)]
    pub host: Option<String>,

    /// Access token (local users only)
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Profile description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    #[sea_orm(nullable)]
    pub banner_url: Option<String>,

    /// Followers count (denormalized)
    #[sea_orm(default_value = 0)]
    pub followers_count: i32,

    /// Following count (denormalized)
    #[sea_orm(default_value = 0)]
    pub following_count: i32,

    /// Notes count (denormalized)
    #[sea_orm(default_value = 0)]
    pub notes_count: i32,

    #[sea_orm(default_value = false)]
    pub is_bot: bool,

    #[sea_orm(default_value = false)]
    pub is_cat: bool,

    /// Requires follow approval
    #[sea_orm(default_value = false)]
    pub is_locked: bool,

    #[sea_orm(default_value = false)]
    pub is_suspended: bool,

    /// Soft-deleted account; never shown through the API
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    /// Profile only visible to followers and staff
    #[sea_orm(default_value = false)]
    pub is_hidden: bool,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    #[sea_orm(default_value = false)]
    pub is_moderator: bool,

    /// `ActivityPub` URI (remote users)
    #[sea_orm(nullable)]
    pub uri: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this user holds a staff role.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.is_admin || self.is_moderator
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::note::Entity")]
    Notes,

    #[sea_orm(has_one = "super::user_profile::Entity")]
    Profile,
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
