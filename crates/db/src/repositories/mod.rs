//! Repository layer for database operations.

mod drive_file;
mod emoji;
mod following;
mod meta_settings;
mod moderation_log;
mod note;
mod user;
mod user_profile;

pub use drive_file::DriveFileRepository;
pub use emoji::EmojiRepository;
pub use following::FollowingRepository;
pub use meta_settings::{META_SETTINGS_ID, MetaSettingsRepository};
pub use moderation_log::ModerationLogRepository;
pub use note::{ModTimelineQuery, NoteRepository};
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
