//! Note entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Note visibility levels.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "home")]
    Home,
    #[sea_orm(string_value = "followers")]
    Followers,
    #[sea_orm(string_value = "specified")]
    Specified,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "note")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Author's host (denormalized for query efficiency)
    #[sea_orm(nullable)]
    pub user_host: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,

    /// Content warning
    #[sea_orm(nullable)]
    pub cw: Option<String>,

    pub visibility: Visibility,

    #[sea_orm(nullable, indexed)]
    pub reply_id: Option<String>,

    #[sea_orm(nullable, indexed)]
    pub renote_id: Option<String>,

    /// Attached file IDs
    #[sea_orm(column_type = "JsonBinary")]
    pub file_ids: Json,

    /// MIME types of the attached files, same order as `file_ids`
    #[sea_orm(column_type = "JsonBinary")]
    pub attached_file_types: Json,

    #[sea_orm(default_value = 0)]
    pub replies_count: i32,

    #[sea_orm(default_value = 0)]
    pub renote_count: i32,

    #[sea_orm(default_value = 0)]
    pub reaction_count: i32,

    /// `ActivityPub` URI
    #[sea_orm(nullable)]
    pub uri: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
