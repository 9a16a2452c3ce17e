//! Conversion between database entities and `ActivityPub` identifiers.

#![allow(missing_docs)]

mod user;

pub use user::{UrlConfig, UserToActorUri};
