//! Business logic services.

#![allow(missing_docs)]

pub mod collection;
pub mod drive;
pub mod emoji;
pub mod event_publisher;
pub mod meta_settings;
pub mod moderation;
pub mod note;
pub mod user;

pub use collection::{
    CollectionPage, CollectionService, CollectionSummary, FollowingMemberStore, MemberRow,
    MemberStore,
};
pub use drive::DriveService;
pub use emoji::{EmojiService, PackedEmoji, derive_emoji_name};
pub use event_publisher::{EventPublisher, EventPublisherService, NoOpEventPublisher, StreamEvent};
pub use meta_settings::MetaSettingsService;
pub use moderation::ModerationService;
pub use note::{ModTimelineInput, NoteService, NoteWithAuthor};
pub use user::{ShowTarget, ShowUserInput, UserDetail, UserLookup, UserService};
