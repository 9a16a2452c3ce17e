//! Following repository.

use std::sync::Arc;

use crate::entities::{Following, following};
use crate::pagination::{MemberDirection, PageSpec};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use yoake_common::{AppError, AppResult};

/// Following repository for database operations.
#[derive(Clone)]
pub struct FollowingRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowingRepository {
    /// Create a new following repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a following relationship by follower and followee.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Option<following::Model>> {
        Following::find()
            .filter(following::Column::FollowerId.eq(follower_id))
            .filter(following::Column::FolloweeId.eq(followee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, followee_id).await?.is_some())
    }

    /// Fetch one page of a user's followers or followees.
    ///
    /// Rows come back in the order the page bounds dictate, at most
    /// `spec.take` of them.
    pub async fn fetch_page(&self, spec: &PageSpec) -> AppResult<Vec<following::Model>> {
        let subject_column = match spec.direction {
            MemberDirection::Followers => following::Column::FolloweeId,
            MemberDirection::Following => following::Column::FollowerId,
        };

        let query = Following::find().filter(subject_column.eq(spec.subject_id.as_str()));

        spec.apply(query, following::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
