//! Emoji repository.

use std::sync::Arc;

use crate::entities::{Emoji, emoji};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use yoake_common::{AppError, AppResult};

/// Emoji repository for database operations.
#[derive(Clone)]
pub struct EmojiRepository {
    db: Arc<DatabaseConnection>,
}

impl EmojiRepository {
    /// Create a new emoji repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an emoji by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<emoji::Model>> {
        Emoji::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an emoji by name and host.
    pub async fn find_by_name_and_host(
        &self,
        name: &str,
        host: Option<&str>,
    ) -> AppResult<Option<emoji::Model>> {
        let mut query = Emoji::find().filter(emoji::Column::Name.eq(name));

        query = match host {
            Some(h) => query.filter(emoji::Column::Host.eq(h)),
            None => query.filter(emoji::Column::Host.is_null()),
        };

        query
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether a local emoji already uses `name`.
    pub async fn local_name_exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_by_name_and_host(name, None).await?.is_some())
    }

    /// Create a new emoji.
    pub async fn create(&self, model: emoji::ActiveModel) -> AppResult<emoji::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
