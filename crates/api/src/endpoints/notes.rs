//! Notes endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use serde_json::Value;
use yoake_common::AppResult;
use yoake_core::{ModTimelineInput, NoteWithAuthor};
use yoake_db::entities::note::Visibility;

use super::users::UserLiteResponse;
use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Note response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: String,
    /// Missing when the author is deleted.
    pub user: Option<UserLiteResponse>,
    pub text: Option<String>,
    pub cw: Option<String>,
    pub visibility: Visibility,
    pub reply_id: Option<String>,
    pub renote_id: Option<String>,
    pub file_ids: Value,
    pub replies_count: i32,
    pub renote_count: i32,
    pub reaction_count: i32,
    pub uri: Option<String>,
}

impl From<NoteWithAuthor> for NoteResponse {
    fn from(NoteWithAuthor { note, author }: NoteWithAuthor) -> Self {
        Self {
            id: note.id,
            created_at: note.created_at.to_rfc3339(),
            user_id: note.user_id,
            user: author.map(Into::into),
            text: note.text,
            cw: note.cw,
            visibility: note.visibility,
            reply_id: note.reply_id,
            renote_id: note.renote_id,
            file_ids: note.file_ids,
            replies_count: note.replies_count,
            renote_count: note.renote_count,
            reaction_count: note.reaction_count,
            uri: note.uri,
        }
    }
}

/// Public notes posted by local moderators and administrators.
///
/// Anyone other than staff gets an empty list.
async fn mod_timeline(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ModTimelineInput>,
) -> AppResult<ApiResponse<Vec<NoteResponse>>> {
    let notes = state.note_service.mod_timeline(user.as_ref(), req).await?;

    Ok(ApiResponse::ok(notes.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/mod-timeline", post(mod_timeline))
}
