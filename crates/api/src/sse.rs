//! Server-Sent Events (SSE) for real-time updates.
//!
//! Instance-wide events such as `emojiAdded` are pushed to every client
//! connected to the main stream.

use std::convert::Infallible;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use yoake_common::AppResult;
use yoake_core::{EventPublisher, StreamEvent};

use crate::middleware::AppState;

const CHANNEL_CAPACITY: usize = 1000;

/// Broadcast channel behind the main SSE stream.
#[derive(Clone)]
pub struct SseBroadcaster {
    main: broadcast::Sender<StreamEvent>,
}

impl SseBroadcaster {
    /// Create a new SSE broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (main, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { main }
    }

    /// Subscribe to the main stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.main.subscribe()
    }

    /// Number of connected clients.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.main.receiver_count()
    }

    /// Send an event to every subscriber. Having none is not an error.
    pub fn broadcast(&self, event: StreamEvent) {
        if self.main.send(event).is_err() {
            tracing::trace!("No SSE subscribers connected");
        }
    }
}

impl Default for SseBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for SseBroadcaster {
    async fn publish(&self, event: StreamEvent) -> AppResult<()> {
        tracing::debug!(event = event.name(), "Broadcasting stream event");
        self.broadcast(event);
        Ok(())
    }
}

fn to_sse_event(event: &StreamEvent) -> Event {
    Event::default()
        .event(event.name())
        .json_data(event)
        .unwrap_or_else(|_| Event::default().data("error"))
}

/// Main SSE stream.
async fn main_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.sse_broadcaster.subscribe();

    // Lagged receivers skip the missed events
    let stream = BroadcastStream::new(rx)
        .filter_map(|result| result.ok().map(|event| Ok(to_sse_event(&event))));

    let initial = stream::once(async { Ok(Event::default().event("connected").data("{}")) });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Create SSE router.
pub fn router() -> Router<AppState> {
    Router::new().route("/main", get(main_stream))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use yoake_core::PackedEmoji;

    fn emoji_added() -> StreamEvent {
        StreamEvent::EmojiAdded {
            emoji: PackedEmoji {
                id: "e1".to_string(),
                aliases: vec![],
                name: "blobcat".to_string(),
                category: None,
                host: None,
                url: "https://files.example/blobcat.png".to_string(),
            },
        }
    }

    #[test]
    fn test_sse_broadcaster_new() {
        let broadcaster = SseBroadcaster::new();
        assert_eq!(broadcaster.receiver_count(), 0);
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        SseBroadcaster::new().broadcast(emoji_added());
    }

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let broadcaster = SseBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.publish(emoji_added()).await.unwrap();

        for rx in [&mut first, &mut second] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.name(), "emojiAdded");
        }
    }
}
