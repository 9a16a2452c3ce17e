//! Test utilities for database operations.
//!
//! Model fixtures for `MockDatabase` based tests in this and dependent crates.

use crate::entities::{drive_file, emoji, following, meta_settings, note, user, user_profile};
use crate::repositories::META_SETTINGS_ID;
use chrono::Utc;
use sea_orm::MockExecResult;
use serde_json::json;

/// A local, active, unprivileged user.
#[must_use]
pub fn user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        host: None,
        token: None,
        name: None,
        description: None,
        avatar_url: None,
        banner_url: None,
        followers_count: 0,
        following_count: 0,
        notes_count: 0,
        is_bot: false,
        is_cat: false,
        is_locked: false,
        is_suspended: false,
        is_deleted: false,
        is_hidden: false,
        is_admin: false,
        is_moderator: false,
        uri: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// A remote user on `host` with an actor URI.
#[must_use]
pub fn remote_user(id: &str, username: &str, host: &str) -> user::Model {
    user::Model {
        host: Some(host.to_string()),
        uri: Some(format!("https://{host}/users/{username}")),
        ..user(id, username)
    }
}

/// A profile with the given follower/following list visibility.
#[must_use]
pub fn profile(user_id: &str, ff_visibility: user_profile::FfVisibility) -> user_profile::Model {
    user_profile::Model {
        user_id: user_id.to_string(),
        ff_visibility,
        pinned_note_ids: json!([]),
        fields: json!([]),
        birthday: None,
        location: None,
        lang: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// A follow relationship row.
#[must_use]
pub fn following(id: &str, follower_id: &str, followee_id: &str) -> following::Model {
    following::Model {
        id: id.to_string(),
        follower_id: follower_id.to_string(),
        followee_id: followee_id.to_string(),
        follower_host: None,
        followee_host: None,
        created_at: Utc::now().into(),
    }
}

/// An uploaded image without a webpublic variant.
#[must_use]
pub fn drive_file(id: &str, name: &str) -> drive_file::Model {
    drive_file::Model {
        id: id.to_string(),
        user_id: Some("owner".to_string()),
        user_host: None,
        name: name.to_string(),
        content_type: "image/png".to_string(),
        size: 2048,
        url: format!("https://files.example/{id}"),
        webpublic_url: None,
        webpublic_type: None,
        is_sensitive: false,
        is_link: false,
        uri: None,
        created_at: Utc::now().into(),
    }
}

/// A custom emoji.
#[must_use]
pub fn emoji(id: &str, name: &str, host: Option<&str>) -> emoji::Model {
    emoji::Model {
        id: id.to_string(),
        name: name.to_string(),
        category: None,
        original_url: format!("https://files.example/{name}.png"),
        public_url: format!("https://files.example/{name}.png"),
        content_type: "image/png".to_string(),
        aliases: json!([]),
        host: host.map(str::to_string),
        license: None,
        is_sensitive: false,
        local_only: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// A public note without attachments.
#[must_use]
pub fn note(id: &str, user_id: &str) -> note::Model {
    note::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_host: None,
        text: Some("hello".to_string()),
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

/// Instance settings with the given fetch restrictions.
#[must_use]
pub fn meta_settings(secure_mode: bool, private_mode: bool) -> meta_settings::Model {
    meta_settings::Model {
        id: META_SETTINGS_ID.to_string(),
        name: Some("yoake".to_string()),
        description: None,
        maintainer_name: None,
        maintainer_email: None,
        secure_mode,
        private_mode,
        blocked_hosts: json!([]),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Exec result for a single-row insert.
#[must_use]
pub const fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}
