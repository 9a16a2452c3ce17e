//! Drive file entity (uploaded files and registered remote links).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drive_file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID; NULL for files owned by the instance itself
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// User's host (denormalized)
    #[sea_orm(nullable)]
    pub user_host: Option<String>,

    /// Original file name
    pub name: String,

    /// MIME type
    pub content_type: String,

    /// File size in bytes
    pub size: i64,

    /// Storage URL (local or object storage)
    pub url: String,

    /// Webpublic URL (optimized version)
    #[sea_orm(nullable)]
    pub webpublic_url: Option<String>,

    /// MIME type of the webpublic version
    #[sea_orm(nullable)]
    pub webpublic_type: Option<String>,

    /// Is this file sensitive (NSFW)?
    #[sea_orm(default_value = false)]
    pub is_sensitive: bool,

    /// Is this a link (not stored locally)?
    #[sea_orm(default_value = false)]
    pub is_link: bool,

    /// `ActivityPub` URI (for remote files)
    #[sea_orm(nullable)]
    pub uri: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// URL clients should load: the webpublic variant when one exists.
    #[must_use]
    pub fn public_url(&self) -> &str {
        self.webpublic_url.as_deref().unwrap_or(&self.url)
    }

    /// MIME type matching [`Model::public_url`].
    #[must_use]
    pub fn public_type(&self) -> &str {
        self.webpublic_type.as_deref().unwrap_or(&self.content_type)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
