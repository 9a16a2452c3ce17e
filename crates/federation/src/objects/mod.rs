//! `ActivityPub` object types.

#![allow(missing_docs)]

mod collection;

pub use collection::{OrderedCollection, OrderedCollectionPage, activitystreams_context};
