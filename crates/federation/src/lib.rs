//! `ActivityPub` surface of yoake.
//!
//! Only the read side lives here:
//!
//! - **Collections**: `followers` and `following` of local users as
//!   `OrderedCollection` / `OrderedCollectionPage` documents
//! - **Fetch checks**: per-request authorization driven by instance settings
//! - **Signatures**: parsing of the HTTP `Signature` header
//!
//! Documents are served as `application/activity+json`.

pub mod convert;
pub mod fetch_check;
pub mod handler;
pub mod objects;
pub mod signature;

pub use convert::*;
pub use fetch_check::{AllowAllFetches, FetchAuthorizer, MetaFetchAuthorizer};
pub use handler::*;
pub use objects::*;
pub use signature::{SignatureComponents, SignatureError};
