//! Meta settings repository.

use std::sync::Arc;

use crate::entities::{MetaSettings, meta_settings};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde_json::json;
use yoake_common::{AppError, AppResult};

/// Repository for instance-wide settings.
#[derive(Clone)]
pub struct MetaSettingsRepository {
    db: Arc<DatabaseConnection>,
}

/// Singleton ID for the meta settings
pub const META_SETTINGS_ID: &str = "instance";

impl MetaSettingsRepository {
    /// Create a new meta settings repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the instance settings, creating default if not exists.
    pub async fn get_or_create(&self) -> AppResult<meta_settings::Model> {
        if let Some(settings) = self.find().await? {
            return Ok(settings);
        }

        let now = chrono::Utc::now();
        let model = meta_settings::ActiveModel {
            id: Set(META_SETTINGS_ID.to_string()),
            name: Set(Some("yoake".to_string())),
            description: Set(None),
            maintainer_name: Set(None),
            maintainer_email: Set(None),
            secure_mode: Set(false),
            private_mode: Set(false),
            blocked_hosts: Set(json!([])),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        tracing::info!("Creating default instance settings");

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the instance settings.
    pub async fn find(&self) -> AppResult<Option<meta_settings::Model>> {
        MetaSettings::find()
            .filter(meta_settings::Column::Id.eq(META_SETTINGS_ID))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_settings(secure_mode: bool) -> meta_settings::Model {
        meta_settings::Model {
            id: META_SETTINGS_ID.to_string(),
            name: Some("yoake".to_string()),
            description: None,
            maintainer_name: None,
            maintainer_email: None,
            secure_mode,
            private_mode: false,
            blocked_hosts: json!(["bad.example"]),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_settings(true)]])
                .into_connection(),
        );

        let repo = MetaSettingsRepository::new(db);
        let settings = repo.get_or_create().await.unwrap();

        assert!(settings.secure_mode);
        assert!(settings.is_restricted());
        assert_eq!(settings.blocked_host_list(), vec!["bad.example".to_string()]);
    }

    #[tokio::test]
    async fn test_get_or_create_inserts_default() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<meta_settings::Model>::new()])
                .append_query_results([[create_test_settings(false)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = MetaSettingsRepository::new(db);
        let settings = repo.get_or_create().await.unwrap();

        assert!(!settings.is_restricted());
    }
}
