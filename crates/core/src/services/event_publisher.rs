//! Event publisher service.
//!
//! Provides an abstraction for publishing real-time events.
//! The actual implementation is provided by the API crate's SSE broadcaster.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use yoake_common::AppResult;

use super::emoji::PackedEmoji;

/// Event types for real-time updates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "body", rename_all = "camelCase")]
pub enum StreamEvent {
    /// A custom emoji became available on this instance.
    EmojiAdded {
        /// The new emoji.
        emoji: PackedEmoji,
    },
}

impl StreamEvent {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EmojiAdded { .. } => "emojiAdded",
        }
    }
}

/// Trait for publishing real-time events.
///
/// This allows the core services to publish events
/// without directly depending on the streaming implementation.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Broadcast an event to every connected client.
    async fn publish(&self, event: StreamEvent) -> AppResult<()>;

    /// Publish an emoji added event.
    async fn publish_emoji_added(&self, emoji: PackedEmoji) -> AppResult<()> {
        self.publish(StreamEvent::EmojiAdded { emoji }).await
    }
}

/// A no-op implementation of `EventPublisher` for testing or when real-time events are disabled.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: StreamEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EventPublisher` trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = StreamEvent::EmojiAdded {
            emoji: PackedEmoji {
                id: "e1".to_string(),
                aliases: vec![],
                name: "blobcat".to_string(),
                category: None,
                host: None,
                url: "https://files.example/blobcat.png".to_string(),
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(event.name(), "emojiAdded");
        assert_eq!(value["type"], "emojiAdded");
        assert_eq!(value["body"]["emoji"]["name"], "blobcat");
    }
}
