//! Meta settings service for instance configuration.

use yoake_common::AppResult;
use yoake_db::{entities::meta_settings, repositories::MetaSettingsRepository};

/// Meta settings service for reading instance configuration.
#[derive(Clone)]
pub struct MetaSettingsService {
    repo: MetaSettingsRepository,
}

impl MetaSettingsService {
    /// Create a new meta settings service.
    #[must_use]
    pub const fn new(repo: MetaSettingsRepository) -> Self {
        Self { repo }
    }

    /// Get meta settings, creating default if not exists.
    pub async fn get(&self) -> AppResult<meta_settings::Model> {
        self.repo.get_or_create().await
    }
}
