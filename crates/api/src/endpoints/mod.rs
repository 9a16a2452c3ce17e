//! API endpoints.

mod admin;
mod notes;
mod users;

use axum::Router;

use crate::middleware::AppState;
use crate::sse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/notes", notes::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
        .nest("/streaming/sse", sse::router())
}
