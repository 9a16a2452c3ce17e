//! Users endpoints.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use serde_json::Value;
use yoake_common::AppResult;
use yoake_core::{ShowTarget, ShowUserInput, UserDetail};
use yoake_db::entities::{user, user_profile::FfVisibility};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Compact user representation embedded in other objects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLiteResponse {
    pub id: String,
    pub username: String,
    pub host: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_bot: bool,
    pub is_cat: bool,
    pub is_admin: bool,
    pub is_moderator: bool,
}

impl From<user::Model> for UserLiteResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            host: user.host,
            name: user.name,
            avatar_url: user.avatar_url,
            is_bot: user.is_bot,
            is_cat: user.is_cat,
            is_admin: user.is_admin,
            is_moderator: user.is_moderator,
        }
    }
}

/// Full profile as returned by `users/show`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailedResponse {
    #[serde(flatten)]
    pub lite: UserLiteResponse,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub description: Option<String>,
    pub banner_url: Option<String>,
    pub uri: Option<String>,
    pub is_locked: bool,
    pub is_suspended: bool,
    /// `null` when the follower list is hidden from the caller.
    pub followers_count: Option<u64>,
    /// `null` when the following list is hidden from the caller.
    pub following_count: Option<u64>,
    pub notes_count: i32,
    pub ff_visibility: FfVisibility,
    pub pinned_note_ids: Value,
    pub fields: Value,
    pub birthday: Option<String>,
    pub location: Option<String>,
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl From<UserDetail> for UserDetailedResponse {
    fn from(detail: UserDetail) -> Self {
        let UserDetail {
            user,
            profile,
            ff_visibility,
            followers_count,
            following_count,
            is_following,
        } = detail;

        let created_at = user.created_at.to_rfc3339();
        let updated_at = user.updated_at.map(|t| t.to_rfc3339());
        let description = user.description.clone();
        let banner_url = user.banner_url.clone();
        let uri = user.uri.clone();
        let is_locked = user.is_locked;
        let is_suspended = user.is_suspended;
        let notes_count = user.notes_count;

        let (pinned_note_ids, fields, birthday, location, lang) = match profile {
            Some(p) => (p.pinned_note_ids, p.fields, p.birthday, p.location, p.lang),
            None => (Value::Array(vec![]), Value::Array(vec![]), None, None, None),
        };

        Self {
            lite: user.into(),
            created_at,
            updated_at,
            description,
            banner_url,
            uri,
            is_locked,
            is_suspended,
            followers_count,
            following_count,
            notes_count,
            ff_visibility,
            pinned_note_ids,
            fields,
            birthday,
            location,
            lang,
            is_following,
        }
    }
}

/// Body of `users/show`: one user, or a list when `userIds` was given.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShowUserResponse {
    One(Box<UserDetailedResponse>),
    Many(Vec<UserDetailedResponse>),
}

/// Get a user by ID or username, or several users by ID.
async fn show(
    MaybeAuthUser(caller): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowUserInput>,
) -> AppResult<ApiResponse<ShowUserResponse>> {
    let response = match req.target()? {
        ShowTarget::One(lookup) => {
            let detail = state.user_service.show(lookup, caller.as_ref()).await?;
            ShowUserResponse::One(Box::new(detail.into()))
        }
        ShowTarget::Many(ids) => {
            let details = state.user_service.show_many(&ids, caller.as_ref()).await?;
            ShowUserResponse::Many(details.into_iter().map(Into::into).collect())
        }
    };

    Ok(ApiResponse::ok(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/show", post(show))
}
