//! Meta settings entity for instance configuration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Instance-wide settings, stored as a single row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meta_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(nullable)]
    pub maintainer_name: Option<String>,

    #[sea_orm(nullable)]
    pub maintainer_email: Option<String>,

    /// Require signed fetches for `ActivityPub` resources
    #[sea_orm(default_value = false)]
    pub secure_mode: bool,

    /// Hide instance content from anyone but local users
    #[sea_orm(default_value = false)]
    pub private_mode: bool,

    /// Hosts refused federation (JSON array of hostnames)
    #[sea_orm(column_type = "JsonBinary")]
    pub blocked_hosts: Json,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Blocked hosts as plain strings; malformed JSON yields no hosts.
    #[must_use]
    pub fn blocked_host_list(&self) -> Vec<String> {
        serde_json::from_value(self.blocked_hosts.clone()).unwrap_or_default()
    }

    /// Whether responses must not be cached by shared caches.
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.secure_mode || self.private_mode
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
