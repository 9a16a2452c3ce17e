//! Drive service.

use sea_orm::Set;
use yoake_common::{AppError, AppResult, IdGenerator};
use yoake_db::{entities::drive_file, repositories::DriveFileRepository};

/// Service for drive file operations.
#[derive(Clone)]
pub struct DriveService {
    drive_file_repo: DriveFileRepository,
    id_gen: IdGenerator,
}

impl DriveService {
    /// Create a new drive service.
    #[must_use]
    pub const fn new(drive_file_repo: DriveFileRepository) -> Self {
        Self {
            drive_file_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a file by ID.
    pub async fn get_file(&self, file_id: &str) -> AppResult<drive_file::Model> {
        self.drive_file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::FileNotFound(file_id.to_string()))
    }

    /// Register a remote URL as an instance-owned link file.
    ///
    /// Nothing is downloaded; the file record points at `url`.
    pub async fn register_link(&self, url: &str, content_type: &str) -> AppResult<drive_file::Model> {
        let name = url
            .rsplit('/')
            .next()
            .and_then(|segment| segment.split(['?', '#']).next())
            .filter(|segment| !segment.is_empty())
            .unwrap_or("unknown");

        let model = drive_file::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(None),
            user_host: Set(None),
            name: Set(name.to_string()),
            content_type: Set(content_type.to_string()),
            size: Set(0),
            url: Set(url.to_string()),
            webpublic_url: Set(None),
            webpublic_type: Set(None),
            is_sensitive: Set(false),
            is_link: Set(true),
            uri: Set(Some(url.to_string())),
            created_at: Set(chrono::Utc::now().into()),
        };

        let file = self.drive_file_repo.create(model).await?;
        tracing::debug!(file_id = %file.id, url = %url, "Registered link file");
        Ok(file)
    }
}
