//! Database entities.

pub mod drive_file;
pub mod emoji;
pub mod following;
pub mod meta_settings;
pub mod moderation_log;
pub mod note;
pub mod user;
pub mod user_profile;

pub use drive_file::Entity as DriveFile;
pub use emoji::Entity as Emoji;
pub use following::Entity as Following;
pub use meta_settings::Entity as MetaSettings;
pub use moderation_log::Entity as ModerationLog;
pub use note::Entity as Note;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
