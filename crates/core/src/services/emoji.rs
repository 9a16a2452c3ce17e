//! Emoji service.

use rand::Rng;
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use yoake_common::{AppError, AppResult, IdGenerator};
use yoake_db::{
    entities::{drive_file, emoji, user},
    repositories::EmojiRepository,
};

use super::{DriveService, EventPublisherService, ModerationService};

static EMOJI_NAME_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("valid emoji name pattern"));

const RANDOM_NAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Emoji as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedEmoji {
    pub id: String,
    pub aliases: Vec<String>,
    pub name: String,
    pub category: Option<String>,
    pub host: Option<String>,
    pub url: String,
}

impl From<&emoji::Model> for PackedEmoji {
    fn from(emoji: &emoji::Model) -> Self {
        Self {
            id: emoji.id.clone(),
            aliases: serde_json::from_value(emoji.aliases.clone()).unwrap_or_default(),
            name: emoji.name.clone(),
            category: emoji.category.clone(),
            host: emoji.host.clone(),
            url: emoji.public_url.clone(),
        }
    }
}

/// Emoji shortcode for an uploaded file.
///
/// The file name up to its first `.` is used when it is a valid shortcode;
/// otherwise a random `_xxxxxxxx_` name is generated.
#[must_use]
pub fn derive_emoji_name(file_name: &str) -> String {
    let stem = file_name.split('.').next().unwrap_or_default();
    if EMOJI_NAME_RE.is_match(stem) {
        return stem.to_string();
    }

    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| char::from(RANDOM_NAME_CHARSET[rng.gen_range(0..RANDOM_NAME_CHARSET.len())]))
        .collect();
    format!("_{suffix}_")
}

/// Service for custom emoji operations.
#[derive(Clone)]
pub struct EmojiService {
    emoji_repo: EmojiRepository,
    drive_service: DriveService,
    moderation_service: ModerationService,
    event_publisher: EventPublisherService,
    id_gen: IdGenerator,
}

impl EmojiService {
    /// Create a new emoji service.
    #[must_use]
    pub fn new(
        emoji_repo: EmojiRepository,
        drive_service: DriveService,
        moderation_service: ModerationService,
        event_publisher: EventPublisherService,
    ) -> Self {
        Self {
            emoji_repo,
            drive_service,
            moderation_service,
            event_publisher,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a local emoji from an uploaded drive file.
    pub async fn add_from_file(
        &self,
        moderator: &user::Model,
        file_id: &str,
    ) -> AppResult<emoji::Model> {
        let file = self.drive_service.get_file(file_id).await?;
        let name = derive_emoji_name(&file.name);
        self.ensure_name_available(&name).await?;

        let emoji = self.insert_local(name, &file).await?;

        // Best effort; the emoji is already published.
        if let Err(e) = self
            .moderation_service
            .log(moderator, "addEmoji", json!({ "emojiId": emoji.id }))
            .await
        {
            tracing::warn!(emoji_id = %emoji.id, error = %e, "Failed to record moderation log");
        }

        tracing::info!(emoji_id = %emoji.id, name = %emoji.name, "Emoji added");
        Ok(emoji)
    }

    /// Copy an emoji (typically a remote one) into the local emoji set.
    pub async fn copy(&self, emoji_id: &str) -> AppResult<emoji::Model> {
        let source = self
            .emoji_repo
            .find_by_id(emoji_id)
            .await?
            .ok_or_else(|| AppError::EmojiNotFound(emoji_id.to_string()))?;

        self.ensure_name_available(&source.name).await?;

        let file = self
            .drive_service
            .register_link(&source.original_url, &source.content_type)
            .await
            .map_err(|e| AppError::Internal(format!("failed to register emoji file: {e}")))?;

        let emoji = self.insert_local(source.name.clone(), &file).await?;

        tracing::info!(
            emoji_id = %emoji.id,
            source_id = %source.id,
            source_host = ?source.host,
            "Emoji copied"
        );
        Ok(emoji)
    }

    async fn ensure_name_available(&self, name: &str) -> AppResult<()> {
        if self.emoji_repo.local_name_exists(name).await? {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Insert a local emoji backed by `file` and announce it.
    async fn insert_local(&self, name: String, file: &drive_file::Model) -> AppResult<emoji::Model> {
        let now = chrono::Utc::now();
        let model = emoji::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name),
            category: Set(None),
            original_url: Set(file.url.clone()),
            public_url: Set(file.public_url().to_string()),
            content_type: Set(file.public_type().to_string()),
            aliases: Set(json!([])),
            host: Set(None),
            license: Set(None),
            is_sensitive: Set(false),
            local_only: Set(false),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        };

        let emoji = self.emoji_repo.create(model).await?;

        self.event_publisher
            .publish_emoji_added(PackedEmoji::from(&emoji))
            .await?;

        Ok(emoji)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::{EventPublisher, StreamEvent};
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::{Arc, Mutex};
    use yoake_db::{
        entities::moderation_log,
        repositories::{DriveFileRepository, ModerationLogRepository},
        test_utils,
    };

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<StreamEvent>>,
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: StreamEvent) -> AppResult<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn service(db: DatabaseConnection, publisher: Arc<RecordingPublisher>) -> EmojiService {
        let db = Arc::new(db);
        EmojiService::new(
            EmojiRepository::new(Arc::clone(&db)),
            DriveService::new(DriveFileRepository::new(Arc::clone(&db))),
            ModerationService::new(ModerationLogRepository::new(Arc::clone(&db))),
            publisher,
        )
    }

    fn admin() -> user::Model {
        let mut admin = test_utils::user("admin1", "admin");
        admin.is_admin = true;
        admin
    }

    fn log_entry() -> moderation_log::Model {
        moderation_log::Model {
            id: "log1".to_string(),
            moderator_id: "admin1".to_string(),
            kind: "addEmoji".to_string(),
            info: json!({ "emojiId": "e1" }),
            created_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_derive_name_uses_valid_stem() {
        assert_eq!(derive_emoji_name("blob_cat.png"), "blob_cat");
        assert_eq!(derive_emoji_name("party2.tar.gz"), "party2");
    }

    #[test]
    fn test_derive_name_randomizes_invalid_stem() {
        for file_name in ["Blobcat.png", "blob-cat.png", ".hidden", "猫.png"] {
            let name = derive_emoji_name(file_name);
            assert_eq!(name.len(), 10, "{file_name} -> {name}");
            assert!(name.starts_with('_') && name.ends_with('_'));
            assert!(EMOJI_NAME_RE.is_match(&name));
        }
    }

    #[tokio::test]
    async fn test_add_from_file() {
        let mut file = test_utils::drive_file("file1", "blobcat.png");
        file.webpublic_url = Some("https://files.example/webpublic-file1".to_string());
        file.webpublic_type = Some("image/webp".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[file]])
            .append_query_results([Vec::<emoji::Model>::new()])
            .append_query_results([[test_utils::emoji("e1", "blobcat", None)]])
            .append_query_results([[log_entry()]])
            .append_exec_results([test_utils::exec_ok(), test_utils::exec_ok()])
            .into_connection();

        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(db, Arc::clone(&publisher));

        let emoji = service.add_from_file(&admin(), "file1").await.unwrap();
        assert_eq!(emoji.name, "blobcat");

        let events = publisher.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "emojiAdded");
    }

    #[tokio::test]
    async fn test_add_survives_moderation_log_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::drive_file("file1", "blobcat.png")]])
            .append_query_results([Vec::<emoji::Model>::new()])
            .append_query_results([[test_utils::emoji("e1", "blobcat", None)]])
            .append_query_errors([sea_orm::DbErr::Custom("moderation log unavailable".to_string())])
            .append_exec_results([test_utils::exec_ok(), test_utils::exec_ok()])
            .into_connection();

        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(db, Arc::clone(&publisher));

        let emoji = service.add_from_file(&admin(), "file1").await.unwrap();
        assert_eq!(emoji.id, "e1");
        assert_eq!(publisher.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_from_missing_file() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<drive_file::Model>::new()])
            .into_connection();

        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(db, Arc::clone(&publisher));

        let result = service.add_from_file(&admin(), "missing").await;
        assert!(matches!(result, Err(AppError::FileNotFound(_))));
        assert!(publisher.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_duplicate_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::drive_file("file1", "blobcat.png")]])
            .append_query_results([[test_utils::emoji("e0", "blobcat", None)]])
            .into_connection();

        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(db, Arc::clone(&publisher));

        let result = service.add_from_file(&admin(), "file1").await;
        assert!(matches!(result, Err(AppError::DuplicateName(name)) if name == "blobcat"));
    }

    #[tokio::test]
    async fn test_copy_remote_emoji() {
        let remote = test_utils::emoji("r1", "blobcat", Some("remote.example"));
        let mut link = test_utils::drive_file("file2", "blobcat.png");
        link.user_id = None;
        link.is_link = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[remote]])
            .append_query_results([Vec::<emoji::Model>::new()])
            .append_query_results([[link]])
            .append_query_results([[test_utils::emoji("e2", "blobcat", None)]])
            .append_exec_results([test_utils::exec_ok(), test_utils::exec_ok()])
            .into_connection();

        let publisher = Arc::new(RecordingPublisher::default());
        let service = service(db, Arc::clone(&publisher));

        let copied = service.copy("r1").await.unwrap();
        assert_eq!(copied.id, "e2");
        assert!(copied.host.is_none());
        assert_eq!(publisher.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_copy_missing_emoji() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<emoji::Model>::new()])
            .into_connection();

        let service = service(db, Arc::new(RecordingPublisher::default()));

        let result = service.copy("missing").await;
        assert!(matches!(result, Err(AppError::EmojiNotFound(_))));
    }

    #[tokio::test]
    async fn test_copy_duplicate_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_utils::emoji("r1", "blobcat", Some("remote.example"))]])
            .append_query_results([[test_utils::emoji("e0", "blobcat", None)]])
            .into_connection();

        let service = service(db, Arc::new(RecordingPublisher::default()));

        let result = service.copy("r1").await;
        assert!(matches!(result, Err(AppError::DuplicateName(_))));
    }
}
