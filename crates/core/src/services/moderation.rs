//! Moderation service.

use sea_orm::Set;
use serde_json::Value;
use yoake_common::{AppResult, IdGenerator};
use yoake_db::{
    entities::{moderation_log, user},
    repositories::ModerationLogRepository,
};

/// Records staff actions in the moderation log.
#[derive(Clone)]
pub struct ModerationService {
    log_repo: ModerationLogRepository,
    id_gen: IdGenerator,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(log_repo: ModerationLogRepository) -> Self {
        Self {
            log_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an entry for an action taken by `moderator`.
    pub async fn log(
        &self,
        moderator: &user::Model,
        kind: &str,
        info: Value,
    ) -> AppResult<moderation_log::Model> {
        let model = moderation_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            moderator_id: Set(moderator.id.clone()),
            kind: Set(kind.to_string()),
            info: Set(info),
            created_at: Set(chrono::Utc::now().into()),
        };

        let entry = self.log_repo.create(model).await?;
        tracing::info!(moderator_id = %moderator.id, kind = %kind, "Moderation action logged");
        Ok(entry)
    }
}
