//! Custom emoji entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Custom emoji, either local or cached from a remote instance.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "emoji")]
pub struct Model {
    /// Emoji ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Emoji shortcode (e.g., "blobcat" for :blobcat:). Unique per host.
    pub name: String,

    /// Category for organizing emojis.
    pub category: Option<String>,

    /// Original image URL.
    pub original_url: String,

    /// URL served to clients.
    pub public_url: String,

    /// MIME type of the emoji image.
    pub content_type: String,

    /// Aliases for this emoji (stored as JSON array).
    pub aliases: Json,

    /// Host where this emoji originates (null for local).
    pub host: Option<String>,

    pub license: Option<String>,

    pub is_sensitive: bool,

    /// Whether this emoji is only usable by local users.
    pub local_only: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
