//! HTTP API layer for yoake.
//!
//! - **Endpoints**: Misskey-compatible `admin/emoji`, `notes/mod-timeline`
//!   and `users/show`
//! - **Extractors**: bearer-token authentication
//! - **Streaming**: Server-Sent Events for instance-wide events
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
pub use sse::SseBroadcaster;
