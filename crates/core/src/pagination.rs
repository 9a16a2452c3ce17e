//! Cursor pagination helpers shared by collection endpoints.

use yoake_common::{AppError, AppResult, is_valid_id};

/// Members per collection page.
pub const COLLECTION_PAGE_LIMIT: u64 = 10;

/// A trimmed page of rows plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows in fetch order, at most the page limit.
    pub items: Vec<T>,
    /// Id of the last kept row when more rows exist.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Trim a look-ahead fetch of up to `limit + 1` rows down to `limit`.
    ///
    /// The extra row only signals that more rows exist; the next cursor is
    /// the id of the last row that is kept.
    #[must_use]
    pub fn from_look_ahead(mut rows: Vec<T>, limit: usize, id_of: impl Fn(&T) -> &str) -> Self {
        let has_more = rows.len() > limit;
        rows.truncate(limit);

        let next_cursor = if has_more {
            rows.last().map(|row| id_of(row).to_string())
        } else {
            None
        };

        Self {
            items: rows,
            next_cursor,
        }
    }

    /// Transform the items while keeping the cursor.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// Validate an optional cursor token.
///
/// Absent and empty tokens mean "start from the newest row".
pub fn parse_cursor(raw: Option<&str>) -> AppResult<Option<String>> {
    match raw {
        None | Some("") => Ok(None),
        Some(token) if is_valid_id(token) => Ok(Some(token.to_string())),
        Some(token) => Err(AppError::InvalidCursor(token.to_string())),
    }
}

/// Parse the `page` query flag.
pub fn parse_page_flag(raw: Option<&str>) -> AppResult<bool> {
    match raw {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(AppError::Validation(format!(
            "page must be \"true\" or \"false\", got {other:?}"
        ))),
    }
}
