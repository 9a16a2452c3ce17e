//! Core business logic for yoake.

pub mod pagination;
pub mod services;
pub mod visibility;

pub use services::*;
pub use visibility::{Disclosure, Viewer};
