//! `ActivityPub` follower and following collections.
//!
//! The axum handlers only translate HTTP into a [`CollectionRequest`] and a
//! [`CollectionResponse`] back into HTTP; [`CollectionState::respond`] does
//! the work.

use std::sync::Arc;

use activitypub_federation::kinds::collection::{OrderedCollectionPageType, OrderedCollectionType};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use yoake_common::{AppError, AppResult};
use yoake_core::{
    CollectionService, MetaSettingsService, Viewer,
    pagination::{parse_cursor, parse_page_flag},
};
use yoake_db::MemberDirection;

use crate::convert::{UrlConfig, UserToActorUri};
use crate::fetch_check::FetchAuthorizer;
use crate::objects::{OrderedCollection, OrderedCollectionPage, activitystreams_context};

/// Content type of every `ActivityPub` document.
pub const ACTIVITY_JSON: &str = "application/activity+json; charset=utf-8";
/// Cache directive for successful responses on restricted instances.
pub const CACHE_PRIVATE: &str = "private, max-age=0, must-revalidate";
/// Cache directive for successful responses on open instances.
pub const CACHE_PUBLIC: &str = "public, max-age=180";
/// Cache directive for visibility denials.
pub const CACHE_DENIED: &str = "public, max-age=30";

/// State required for collection handlers.
#[derive(Clone)]
pub struct CollectionState {
    pub collection_service: CollectionService,
    pub meta_service: MetaSettingsService,
    pub authorizer: Arc<dyn FetchAuthorizer>,
    pub url_config: UrlConfig,
}

/// Raw query parameters; validated by [`CollectionState::respond`].
#[derive(Debug, Default, Deserialize)]
pub struct CollectionQuery {
    pub cursor: Option<String>,
    pub page: Option<String>,
}

/// Everything a collection response depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    pub subject_id: String,
    pub direction: MemberDirection,
    pub cursor: Option<String>,
    pub page: Option<String>,
    /// Why the query string could not be decoded, if it could not.
    pub query_error: Option<String>,
    /// `Signature` header of the fetch, if signed.
    pub signature: Option<String>,
}

/// Outcome of a collection request.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResponse {
    pub status: StatusCode,
    pub cache_control: Option<&'static str>,
    pub body: Option<Value>,
}

impl CollectionResponse {
    fn status_only(status: StatusCode) -> Self {
        Self {
            status,
            cache_control: None,
            body: None,
        }
    }

    fn from_error(err: &AppError) -> Self {
        match err {
            AppError::Forbidden(_) => Self {
                status: StatusCode::FORBIDDEN,
                cache_control: Some(CACHE_DENIED),
                body: None,
            },
            err if err.is_server_error() => {
                error!(error = %err, "Collection request failed");
                Self::status_only(err.status_code())
            }
            err => {
                debug!(error = %err, "Collection request rejected");
                Self::status_only(err.status_code())
            }
        }
    }
}

impl IntoResponse for CollectionResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => (self.status, [(CONTENT_TYPE, ACTIVITY_JSON)], Json(body)).into_response(),
            None => self.status.into_response(),
        };

        if let Some(directive) = self.cache_control {
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static(directive));
        }

        response
    }
}

impl CollectionState {
    /// Answer a collection request.
    pub async fn respond(&self, request: &CollectionRequest) -> CollectionResponse {
        self.try_respond(request)
            .await
            .unwrap_or_else(|err| CollectionResponse::from_error(&err))
    }

    async fn try_respond(&self, request: &CollectionRequest) -> AppResult<CollectionResponse> {
        let verdict = self
            .authorizer
            .authorize(request.signature.as_deref())
            .await?;
        if verdict != StatusCode::OK {
            return Ok(CollectionResponse::status_only(verdict));
        }

        if let Some(reason) = &request.query_error {
            return Err(AppError::BadRequest(reason.clone()));
        }

        let cursor = parse_cursor(request.cursor.as_deref())?;
        let page = parse_page_flag(request.page.as_deref())?;

        let body = if page {
            self.render_page(request, cursor).await?
        } else {
            self.render_summary(request).await?
        };

        let meta = self.meta_service.get().await?;
        let cache_control = if meta.is_restricted() {
            CACHE_PRIVATE
        } else {
            CACHE_PUBLIC
        };

        Ok(CollectionResponse {
            status: StatusCode::OK,
            cache_control: Some(cache_control),
            body: Some(body),
        })
    }

    async fn render_summary(&self, request: &CollectionRequest) -> AppResult<Value> {
        let summary = self
            .collection_service
            .summary(&request.subject_id, request.direction, Viewer::Anonymous)
            .await?;

        let collection_url = self
            .url_config
            .collection_url(&summary.subject_id, request.direction);

        let collection = OrderedCollection {
            context: activitystreams_context(),
            kind: OrderedCollectionType::OrderedCollection,
            first: summary
                .pages_allowed
                .then(|| format!("{collection_url}?page=true")),
            id: collection_url,
            total_items: summary.total,
        };

        to_value(&collection)
    }

    async fn render_page(
        &self,
        request: &CollectionRequest,
        cursor: Option<String>,
    ) -> AppResult<Value> {
        let page = self
            .collection_service
            .page(
                &request.subject_id,
                request.direction,
                cursor.clone(),
                Viewer::Anonymous,
            )
            .await?;

        let collection_url = self
            .url_config
            .collection_url(&page.subject_id, request.direction);

        let id = match &cursor {
            Some(cursor) => format!("{collection_url}?page=true&cursor={cursor}"),
            None => format!("{collection_url}?page=true"),
        };

        let document = OrderedCollectionPage {
            context: activitystreams_context(),
            kind: OrderedCollectionPageType::OrderedCollectionPage,
            id,
            total_items: page.total,
            ordered_items: page
                .members
                .iter()
                .map(|member| member.actor_uri(&self.url_config))
                .collect(),
            next: page
                .next_cursor
                .map(|next| format!("{collection_url}?page=true&cursor={next}")),
            part_of: collection_url,
        };

        to_value(&document)
    }
}

fn to_value<T: serde::Serialize>(document: &T) -> AppResult<Value> {
    serde_json::to_value(document).map_err(|e| AppError::Internal(e.to_string()))
}

async fn respond(
    state: &CollectionState,
    subject_id: String,
    direction: MemberDirection,
    query: Result<Query<CollectionQuery>, QueryRejection>,
    headers: &HeaderMap,
) -> Response {
    let (query, query_error) = match query {
        Ok(Query(query)) => (query, None),
        Err(rejection) => (CollectionQuery::default(), Some(rejection.body_text())),
    };

    let request = CollectionRequest {
        subject_id,
        direction,
        cursor: query.cursor,
        page: query.page,
        query_error,
        signature: headers
            .get("signature")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    debug!(subject_id = %request.subject_id, direction = ?direction, "ActivityPub collection lookup");
    state.respond(&request).await.into_response()
}

/// Handle GET /users/{id}/followers.
pub async fn followers_handler(
    State(state): State<CollectionState>,
    Path(user_id): Path<String>,
    query: Result<Query<CollectionQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    respond(&state, user_id, MemberDirection::Followers, query, &headers).await
}

/// Handle GET /users/{id}/following.
pub async fn following_handler(
    State(state): State<CollectionState>,
    Path(user_id): Path<String>,
    query: Result<Query<CollectionQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    respond(&state, user_id, MemberDirection::Following, query, &headers).await
}

/// Routes for both collections.
pub fn collection_routes(state: CollectionState) -> Router {
    Router::new()
        .route("/users/{id}/followers", get(followers_handler))
        .route("/users/{id}/following", get(following_handler))
        .with_state(state)
}
