//! Note repository.

use std::sync::Arc;

use crate::entities::{Note, User, note, user};
use crate::pagination::IdBounds;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    sea_query::Expr,
};
use yoake_common::{AppError, AppResult};

/// Filters for the moderation timeline.
#[derive(Debug, Clone, Default)]
pub struct ModTimelineQuery {
    /// Id window and ordering.
    pub bounds: IdBounds,
    /// Maximum number of notes.
    pub limit: u64,
    /// Only notes with at least one attachment.
    pub with_files: bool,
    /// Only notes with an attachment of one of these MIME types.
    pub file_types: Option<Vec<String>>,
    /// With `file_types`: drop notes with a content warning or a sensitive attachment.
    pub exclude_nsfw: bool,
}

/// Note repository for database operations.
#[derive(Clone)]
pub struct NoteRepository {
    db: Arc<DatabaseConnection>,
}

impl NoteRepository {
    /// Create a new note repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Public notes written by local moderators and administrators.
    pub async fn find_mod_timeline(&self, params: &ModTimelineQuery) -> AppResult<Vec<note::Model>> {
        let staff = Condition::any()
            .add(user::Column::IsModerator.eq(true))
            .add(user::Column::IsAdmin.eq(true));

        let mut condition = Condition::all()
            .add(note::Column::Visibility.eq(note::Visibility::Public))
            .add(note::Column::UserHost.is_null())
            .add(staff);

        let file_types = params.file_types.as_deref();

        if params.with_files || file_types.is_some() {
            condition = condition.add(Expr::cust(r#"jsonb_array_length("note"."file_ids") > 0"#));
        }

        if let Some(types) = file_types {
            // An empty list still requires attachments but matches any type.
            if !types.is_empty() {
                let any_type = types.iter().fold(Condition::any(), |cond, t| {
                    cond.add(Expr::cust_with_values(
                        r#""note"."attached_file_types" @> $1::jsonb"#,
                        [serde_json::json!([t]).to_string()],
                    ))
                });
                condition = condition.add(any_type);
            }

            if params.exclude_nsfw {
                condition = condition.add(note::Column::Cw.is_null()).add(Expr::cust(
                    r#"NOT EXISTS (SELECT 1 FROM "drive_file" WHERE "drive_file"."is_sensitive" = TRUE AND "note"."file_ids" @> to_jsonb("drive_file"."id"))"#,
                ));
            }
        }

        let query = Note::find().inner_join(User).filter(condition);

        params
            .bounds
            .apply(query, note::Column::Id)
            .limit(params.limit)
            .all(self.db.as_ref())
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
    use serde_json::json;

    fn create_test_note(id: &str) -> note::Model {
        note::Model {
            id: id.to_string(),
            user_id: "admin1".to_string(),
            user_host: None,
            text: Some("Scheduled maintenance tonight".to_string()),
            cw: None,
            visibility: note::Visibility::Public,
            reply_id: None,
            renote_id: None,
            file_ids: json!([]),
            attached_file_types: json!([]),
            replies_count: 0,
            renote_count: 0,
            reaction_count: 0,
            uri: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    async fn run(params: ModTimelineQuery) -> (Vec<note::Model>, String) {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_note("note2"), create_test_note("note1")]])
                .into_connection(),
        );

        let repo = NoteRepository::new(Arc::clone(&db));
        let notes = repo.find_mod_timeline(&params).await.unwrap();
        drop(repo);

        let conn = Arc::try_unwrap(db).ok().unwrap();
        let log = format!("{:?}", conn.into_transaction_log());
        (notes, log)
    }

    #[tokio::test]
    async fn test_mod_timeline_restricts_to_local_staff() {
        let (notes, log) = run(ModTimelineQuery {
            limit: 10,
            ..Default::default()
        })
        .await;

        assert_eq!(notes.len(), 2);
        assert!(log.contains("INNER JOIN"));
        assert!(log.contains("is_moderator"));
        assert!(log.contains("is_admin"));
        assert!(log.contains("user_host"));
        assert!(log.contains("DESC"));
        assert!(!log.contains("jsonb_array_length"));
    }

    #[tokio::test]
    async fn test_mod_timeline_since_only_is_ascending() {
        let (_, log) = run(ModTimelineQuery {
            bounds: IdBounds {
                since_id: Some("note0".to_string()),
                until_id: None,
            },
            limit: 10,
            ..Default::default()
        })
        .await;

        assert!(log.contains("ASC"));
    }

    #[tokio::test]
    async fn test_mod_timeline_with_files() {
        let (_, log) = run(ModTimelineQuery {
            limit: 10,
            with_files: true,
            ..Default::default()
        })
        .await;

        assert!(log.contains("jsonb_array_length"));
        assert!(!log.contains(r#"attached_file_types\" @>"#));
    }

    #[tokio::test]
    async fn test_mod_timeline_file_types_and_nsfw() {
        let (_, log) = run(ModTimelineQuery {
            limit: 10,
            file_types: Some(vec!["image/png".to_string(), "image/webp".to_string()]),
            exclude_nsfw: true,
            ..Default::default()
        })
        .await;

        assert!(log.contains("jsonb_array_length"));
        assert!(log.contains(r#"attached_file_types\" @>"#));
        assert!(log.contains("image/webp"));
        assert!(log.contains("is_sensitive"));
        assert!(log.contains(r#"cw\" IS NULL"#));
    }

    #[tokio::test]
    async fn test_mod_timeline_empty_file_types_requires_files() {
        let (_, log) = run(ModTimelineQuery {
            limit: 10,
            file_types: Some(vec![]),
            exclude_nsfw: true,
            ..Default::default()
        })
        .await;

        assert!(log.contains("jsonb_array_length"));
        assert!(!log.contains(r#"attached_file_types\" @>"#));
        assert!(log.contains("is_sensitive"));
        assert!(log.contains(r#"cw\" IS NULL"#));
    }
}
