//! User -> actor URI conversion.

use url::Url;
use yoake_db::{MemberDirection, entities::user};

/// Configuration for generating local URLs.
#[derive(Debug, Clone)]
pub struct UrlConfig {
    base: String,
}

impl UrlConfig {
    /// Create a new URL config rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            base: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Actor URL of a local user.
    #[must_use]
    pub fn user_url(&self, user_id: &str) -> String {
        format!("{}/users/{user_id}", self.base)
    }

    /// Followers collection URL.
    #[must_use]
    pub fn followers_url(&self, user_id: &str) -> String {
        format!("{}/followers", self.user_url(user_id))
    }

    /// Following collection URL.
    #[must_use]
    pub fn following_url(&self, user_id: &str) -> String {
        format!("{}/following", self.user_url(user_id))
    }

    /// URL of a user's follower or following collection.
    #[must_use]
    pub fn collection_url(&self, user_id: &str, direction: MemberDirection) -> String {
        match direction {
            MemberDirection::Followers => self.followers_url(user_id),
            MemberDirection::Following => self.following_url(user_id),
        }
    }
}

/// Extension trait for addressing a user as an `ActivityPub` actor.
pub trait UserToActorUri {
    /// The remote actor URI, or the local actor URL.
    fn actor_uri(&self, config: &UrlConfig) -> String;
}

impl UserToActorUri for user::Model {
    fn actor_uri(&self, config: &UrlConfig) -> String {
        match (&self.host, &self.uri) {
            (Some(_), Some(uri)) => uri.clone(),
            _ => config.user_url(&self.id),
        }
    }
}
