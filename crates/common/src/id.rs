//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// Longest identifier accepted from clients.
pub const MAX_ID_LENGTH: usize = 32;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Smallest ID that could have been generated at `timestamp_ms`.
    ///
    /// Used to turn date bounds into ID bounds: every ID generated at or after
    /// the instant compares greater than or equal to the returned value.
    #[must_use]
    pub fn id_at(&self, timestamp_ms: u64) -> String {
        Ulid::from_parts(timestamp_ms, 0).to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Whether `value` is a well-formed entity identifier.
///
/// Identifiers are 1 to [`MAX_ID_LENGTH`] lowercase ASCII letters or digits,
/// matching what [`IdGenerator`] produces.
#[must_use]
pub fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_ID_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
