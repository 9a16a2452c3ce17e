//! Admin/Moderation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use yoake_common::{AppError, AppResult, is_valid_id};
use yoake_db::entities::user;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Response carrying only the new emoji's id.
#[derive(Debug, Serialize)]
pub struct EmojiIdResponse {
    pub id: String,
}

/// Add emoji request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEmojiRequest {
    pub file_id: String,
}

/// Copy emoji request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyEmojiRequest {
    pub emoji_id: String,
}

fn require_staff(user: &user::Model) -> AppResult<()> {
    if !user.is_admin && !user.is_moderator {
        return Err(AppError::Forbidden(
            "Only administrators and moderators can manage emojis".to_string(),
        ));
    }
    Ok(())
}

fn require_id(field: &str, value: &str) -> AppResult<()> {
    if !is_valid_id(value) {
        return Err(AppError::Validation(format!("{field} is not a valid id")));
    }
    Ok(())
}

/// Register an uploaded drive file as a local emoji.
async fn add_emoji(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddEmojiRequest>,
) -> AppResult<ApiResponse<EmojiIdResponse>> {
    require_staff(&user)?;
    require_id("fileId", &req.file_id)?;

    let emoji = state.emoji_service.add_from_file(&user, &req.file_id).await?;

    Ok(ApiResponse::ok(EmojiIdResponse { id: emoji.id }))
}

/// Copy an existing (usually remote) emoji into the local set.
async fn copy_emoji(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CopyEmojiRequest>,
) -> AppResult<ApiResponse<EmojiIdResponse>> {
    require_staff(&user)?;
    require_id("emojiId", &req.emoji_id)?;

    let emoji = state.emoji_service.copy(&req.emoji_id).await?;

    Ok(ApiResponse::ok(EmojiIdResponse { id: emoji.id }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/emoji/add", post(add_emoji))
        .route("/emoji/copy", post(copy_emoji))
}
