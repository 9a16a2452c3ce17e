//! Moderation log entity (audit trail of staff actions).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Staff member who performed the action
    #[sea_orm(indexed)]
    pub moderator_id: String,

    /// Action name, e.g. "addEmoji"
    #[sea_orm(column_name = "type")]
    pub kind: String,

    /// Action-specific payload
    #[sea_orm(column_type = "JsonBinary")]
    pub info: Json,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ModeratorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Moderator,
}

impl ActiveModelBehavior for ActiveModel {}
