//! User profile repository.

use std::sync::Arc;

use crate::entities::{UserProfile, user_profile};
use sea_orm::{DatabaseConnection, EntityTrait};
use yoake_common::{AppError, AppResult};

/// User profile repository for database operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user profile by user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Follower/following list visibility of a user.
    ///
    /// `None` when the user has no profile row.
    pub async fn ff_visibility(
        &self,
        user_id: &str,
    ) -> AppResult<Option<user_profile::FfVisibility>> {
        Ok(self
            .find_by_user_id(user_id)
            .await?
            .map(|p| p.ff_visibility))
    }
}
