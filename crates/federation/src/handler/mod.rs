//! `ActivityPub` request handlers.

#![allow(missing_docs)]

mod collections;

pub use collections::{
    ACTIVITY_JSON, CACHE_DENIED, CACHE_PRIVATE, CACHE_PUBLIC, CollectionQuery, CollectionRequest,
    CollectionResponse, CollectionState, collection_routes, followers_handler, following_handler,
};
