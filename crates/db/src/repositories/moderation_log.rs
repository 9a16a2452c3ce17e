//! Moderation log repository.

use std::sync::Arc;

use crate::entities::moderation_log;
use sea_orm::{ActiveModelTrait, DatabaseConnection};
use yoake_common::{AppError, AppResult};

/// Append-only store of staff actions.
#[derive(Clone)]
pub struct ModerationLogRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationLogRepository {
    /// Create a new moderation log repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a log entry.
    pub async fn create(
        &self,
        model: moderation_log::ActiveModel,
    ) -> AppResult<moderation_log::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
