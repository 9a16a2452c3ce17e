//! Note service.

use std::collections::HashMap;

use serde::Deserialize;
use validator::{Validate, ValidationError};
use yoake_common::{AppResult, IdGenerator, is_valid_id};
use yoake_db::{
    IdBounds,
    entities::{note, user},
    repositories::{ModTimelineQuery, NoteRepository, UserRepository},
};

/// Note service for business logic.
#[derive(Clone)]
pub struct NoteService {
    note_repo: NoteRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// A note together with its author.
#[derive(Debug, Clone)]
pub struct NoteWithAuthor {
    pub note: note::Model,
    pub author: Option<user::Model>,
}

/// Input for the moderation timeline.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModTimelineInput {
    #[serde(default)]
    pub with_files: bool,

    #[serde(default, rename = "fileType")]
    pub file_types: Option<Vec<String>>,

    #[serde(default)]
    pub exclude_nsfw: bool,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,

    #[validate(custom(function = "validate_id"))]
    pub since_id: Option<String>,

    #[validate(custom(function = "validate_id"))]
    pub until_id: Option<String>,

    /// Milliseconds since the Unix epoch.
    pub since_date: Option<i64>,

    /// Milliseconds since the Unix epoch.
    pub until_date: Option<i64>,
}

const fn default_limit() -> u64 {
    10
}

fn validate_id(value: &str) -> Result<(), ValidationError> {
    if is_valid_id(value) {
        Ok(())
    } else {
        Err(ValidationError::new("id"))
    }
}

impl Default for ModTimelineInput {
    fn default() -> Self {
        Self {
            with_files: false,
            file_types: None,
            exclude_nsfw: false,
            limit: default_limit(),
            since_id: None,
            until_id: None,
            since_date: None,
            until_date: None,
        }
    }
}

impl ModTimelineInput {
    /// Id bounds for this request. Id bounds win over date bounds.
    fn bounds(&self, id_gen: &IdGenerator) -> IdBounds {
        if self.since_id.is_some() || self.until_id.is_some() {
            return IdBounds {
                since_id: self.since_id.clone(),
                until_id: self.until_id.clone(),
            };
        }

        let to_id = |ms: i64| id_gen.id_at(u64::try_from(ms).unwrap_or(0));
        IdBounds {
            since_id: self.since_date.map(to_id),
            until_id: self.until_date.map(to_id),
        }
    }
}

impl NoteService {
    /// Create a new note service.
    #[must_use]
    pub const fn new(note_repo: NoteRepository, user_repo: UserRepository) -> Self {
        Self {
            note_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Public notes by local staff, for moderators and administrators.
    ///
    /// Everyone else gets an empty timeline rather than an error.
    pub async fn mod_timeline(
        &self,
        caller: Option<&user::Model>,
        input: ModTimelineInput,
    ) -> AppResult<Vec<NoteWithAuthor>> {
        input.validate()?;

        if !caller.is_some_and(user::Model::is_staff) {
            return Ok(vec![]);
        }

        let params = ModTimelineQuery {
            bounds: input.bounds(&self.id_gen),
            limit: input.limit,
            with_files: input.with_files,
            file_types: input.file_types,
            exclude_nsfw: input.exclude_nsfw,
        };

        let notes = self.note_repo.find_mod_timeline(&params).await?;
        self.attach_authors(notes).await
    }

    async fn attach_authors(&self, notes: Vec<note::Model>) -> AppResult<Vec<NoteWithAuthor>> {
        let mut author_ids: Vec<String> = notes.iter().map(|n| n.user_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();

        let authors: HashMap<String, user::Model> = self
            .user_repo
            .find_visible_by_ids(&author_ids, true)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(notes
            .into_iter()
            .map(|note| {
                let author = authors.get(&note.user_id).cloned();
                NoteWithAuthor { note, author }
            })
            .collect())
    }
}
