//! User service.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use serde::Deserialize;
use validator::{Validate, ValidationError};
use yoake_common::{AppError, AppResult, Config, is_valid_id};
use yoake_db::{
    entities::{user, user_profile},
    repositories::{FollowingRepository, UserProfileRepository, UserRepository},
};

use crate::visibility::{Viewer, can_view};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    following_repo: FollowingRepository,
    local_host: String,
}

/// Input for `users/show`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserInput {
    #[validate(length(min = 1, max = 32))]
    pub user_id: Option<String>,

    #[validate(length(max = 100), custom(function = "validate_user_ids"))]
    pub user_ids: Option<Vec<String>>,

    #[validate(length(min = 1, max = 128))]
    pub username: Option<String>,

    pub host: Option<String>,
}

/// Every entry must be a well-formed id, and no id may repeat.
fn validate_user_ids(ids: &[String]) -> Result<(), ValidationError> {
    if !ids.iter().all(|id| is_valid_id(id)) {
        return Err(ValidationError::new("id"));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    if !ids.iter().all(|id| seen.insert(id.as_str())) {
        return Err(ValidationError::new("unique"));
    }
    Ok(())
}

/// How a single user is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// By primary key.
    Id(String),
    /// By username; `None` host means local.
    Username {
        username: String,
        host: Option<String>,
    },
}

/// What a `users/show` request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowTarget {
    One(UserLookup),
    Many(Vec<String>),
}

impl ShowUserInput {
    /// Resolve the request form. `userIds` wins over the single-user forms.
    pub fn target(self) -> AppResult<ShowTarget> {
        self.validate()?;

        if let Some(ids) = self.user_ids {
            return Ok(ShowTarget::Many(ids));
        }

        match (self.username, self.host, self.user_id) {
            (Some(username), Some(host), _) => Ok(ShowTarget::One(UserLookup::Username {
                username,
                host: Some(host),
            })),
            (_, _, Some(id)) => Ok(ShowTarget::One(UserLookup::Id(id))),
            (Some(username), None, None) => Ok(ShowTarget::One(UserLookup::Username {
                username,
                host: None,
            })),
            (None, _, None) => Err(AppError::Validation(
                "one of userId, userIds or username is required".to_string(),
            )),
        }
    }
}

/// A user with the details shown on their profile.
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: user::Model,
    pub profile: Option<user_profile::Model>,
    pub ff_visibility: user_profile::FfVisibility,
    /// `None` when the caller may not see the followers list.
    pub followers_count: Option<u64>,
    /// `None` when the caller may not see the following list.
    pub following_count: Option<u64>,
    /// Whether the caller follows this user; `None` for anonymous callers and self.
    pub is_following: Option<bool>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        following_repo: FollowingRepository,
        config: &Config,
    ) -> Self {
        let local_host = url::Url::parse(&config.server.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        Self {
            user_repo,
            profile_repo,
            following_repo,
            local_host,
        }
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .filter(|u| !u.is_deleted && !u.is_suspended)
            .ok_or(AppError::Unauthorized)
    }

    /// Show a single user.
    pub async fn show(
        &self,
        lookup: UserLookup,
        caller: Option<&user::Model>,
    ) -> AppResult<UserDetail> {
        let include_suspended = caller.is_some_and(user::Model::is_staff);

        let user = self
            .resolve(&lookup)
            .await?
            .filter(|u| !u.is_deleted && (include_suspended || !u.is_suspended))
            .ok_or_else(|| AppError::UserNotFound(describe(&lookup)))?;

        let is_following = self.caller_follows(&user, caller).await?;
        let viewer = Self::viewer(&user, caller, is_following);

        if user.is_hidden {
            match (caller, viewer) {
                (None, _) => return Err(AppError::Forbidden("this user is hidden".to_string())),
                (Some(_), Viewer::Anonymous) => {
                    return Err(AppError::Forbidden(
                        "only followers may view this user".to_string(),
                    ));
                }
                _ => {}
            }
        }

        self.detail(user, viewer, is_following).await
    }

    /// Show several users, in the order their ids were given.
    ///
    /// Unknown and deleted ids are skipped, as are suspended users unless the
    /// caller is staff.
    pub async fn show_many(
        &self,
        ids: &[String],
        caller: Option<&user::Model>,
    ) -> AppResult<Vec<UserDetail>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let include_suspended = caller.is_some_and(user::Model::is_staff);
        let mut by_id: HashMap<String, user::Model> = self
            .user_repo
            .find_visible_by_ids(ids, include_suspended)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let ordered: Vec<user::Model> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        try_join_all(ordered.into_iter().map(|user| async move {
            let is_following = self.caller_follows(&user, caller).await?;
            let viewer = Self::viewer(&user, caller, is_following);
            self.detail(user, viewer, is_following).await
        }))
        .await
    }

    async fn resolve(&self, lookup: &UserLookup) -> AppResult<Option<user::Model>> {
        match lookup {
            UserLookup::Id(id) => self.user_repo.find_by_id(id).await,
            UserLookup::Username { username, host } => {
                let host = host.as_deref().filter(|h| !self.is_local_host(h));
                let found = self
                    .user_repo
                    .find_by_username_and_host(username, host)
                    .await?;

                match (found, host) {
                    (None, Some(host)) => {
                        tracing::debug!(username = %username, host = %host, "Unknown remote user");
                        Err(AppError::RemoteResolution(format!("@{username}@{host}")))
                    }
                    (found, _) => Ok(found),
                }
            }
        }
    }

    fn is_local_host(&self, host: &str) -> bool {
        host.eq_ignore_ascii_case(&self.local_host)
    }

    async fn caller_follows(
        &self,
        subject: &user::Model,
        caller: Option<&user::Model>,
    ) -> AppResult<Option<bool>> {
        match caller {
            Some(me) if me.id != subject.id => self
                .following_repo
                .is_following(&me.id, &subject.id)
                .await
                .map(Some),
            _ => Ok(None),
        }
    }

    fn viewer(subject: &user::Model, caller: Option<&user::Model>, is_following: Option<bool>) -> Viewer {
        match caller {
            None => Viewer::Anonymous,
            Some(me) if me.id == subject.id => Viewer::Owner,
            Some(me) if me.is_staff() => Viewer::Moderator,
            Some(_) if is_following == Some(true) => Viewer::Follower,
            Some(_) => Viewer::Anonymous,
        }
    }

    async fn detail(
        &self,
        user: user::Model,
        viewer: Viewer,
        is_following: Option<bool>,
    ) -> AppResult<UserDetail> {
        let profile = self.profile_repo.find_by_user_id(&user.id).await?;
        let ff_visibility = profile
            .as_ref()
            .map(|p| p.ff_visibility)
            .unwrap_or_default();

        let visible = can_view(ff_visibility, viewer);
        let count = |n: i32| visible.then(|| u64::try_from(n).unwrap_or(0));

        Ok(UserDetail {
            followers_count: count(user.followers_count),
            following_count: count(user.following_count),
            user,
            profile,
            ff_visibility,
            is_following,
        })
    }
}

fn describe(lookup: &UserLookup) -> String {
    match lookup {
        UserLookup::Id(id) => id.clone(),
        UserLookup::Username { username, host: Some(host) } => format!("@{username}@{host}"),
        UserLookup::Username { username, host: None } => format!("@{username}"),
    }
}
