//! Drive file repository.

use std::sync::Arc;

use crate::entities::{DriveFile, drive_file};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use yoake_common::{AppError, AppResult};

/// Drive file repository for database operations.
#[derive(Clone)]
pub struct DriveFileRepository {
    db: Arc<DatabaseConnection>,
}

impl DriveFileRepository {
    /// Create a new drive file repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a drive file by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<drive_file::Model>> {
        DriveFile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new drive file.
    pub async fn create(&self, model: drive_file::ActiveModel) -> AppResult<drive_file::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_file(id: &str) -> drive_file::Model {
        drive_file::Model {
            id: id.to_string(),
            user_id: Some("user1".to_string()),
            user_host: None,
            name: "blobcat.png".to_string(),
            content_type: "image/png".to_string(),
            size: 1024,
            url: "https://files.example/blobcat.png".to_string(),
            webpublic_url: None,
            webpublic_type: None,
            is_sensitive: false,
            is_link: false,
            uri: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_file("file1")]])
                .into_connection(),
        );

        let repo = DriveFileRepository::new(db);
        let file = repo.find_by_id("file1").await.unwrap().unwrap();

        assert_eq!(file.name, "blobcat.png");
        assert_eq!(file.public_url(), "https://files.example/blobcat.png");
        assert_eq!(file.public_type(), "image/png");
    }

    #[test]
    fn test_public_variant_prefers_webpublic() {
        let mut file = create_test_file("file1");
        file.webpublic_url = Some("https://files.example/webpublic-blobcat.webp".to_string());
        file.webpublic_type = Some("image/webp".to_string());

        assert_eq!(
            file.public_url(),
            "https://files.example/webpublic-blobcat.webp"
        );
        assert_eq!(file.public_type(), "image/webp");
    }
}
