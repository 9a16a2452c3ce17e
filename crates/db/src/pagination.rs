//! Typed page specifications for id-ordered queries.
//!
//! Every paginated table in yoake is keyed by a lowercase ULID, so "newer"
//! and "larger id" are the same thing. A page is described by optional
//! exclusive id bounds and a row count; the repositories turn that into a
//! single `WHERE`/`ORDER BY`/`LIMIT` query.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};

/// Exclusive id bounds for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdBounds {
    /// Only rows with `id > since_id`.
    pub since_id: Option<String>,
    /// Only rows with `id < until_id`.
    pub until_id: Option<String>,
}

impl IdBounds {
    /// Bounds that only cap the page from above.
    #[must_use]
    pub const fn until(until_id: Option<String>) -> Self {
        Self {
            since_id: None,
            until_id,
        }
    }

    /// Whether rows come back oldest first.
    ///
    /// Only a lone lower bound reads forward; everything else reads newest first.
    #[must_use]
    pub const fn is_ascending(&self) -> bool {
        self.since_id.is_some() && self.until_id.is_none()
    }

    /// Apply the bounds and ordering to `query` on the given id column.
    #[must_use]
    pub fn apply<E, C>(&self, mut query: Select<E>, id_column: C) -> Select<E>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        if let Some(since) = &self.since_id {
            query = query.filter(id_column.gt(since.as_str()));
        }
        if let Some(until) = &self.until_id {
            query = query.filter(id_column.lt(until.as_str()));
        }

        if self.is_ascending() {
            query.order_by_asc(id_column)
        } else {
            query.order_by_desc(id_column)
        }
    }
}

/// Which side of a follow relationship a collection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberDirection {
    /// Users following the subject (subject is the followee).
    Followers,
    /// Users the subject follows (subject is the follower).
    Following,
}

/// One page of a user's follow collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    /// Owner of the collection.
    pub subject_id: String,
    /// Which collection of the subject.
    pub direction: MemberDirection,
    /// Id window.
    pub bounds: IdBounds,
    /// Rows to fetch, including any look-ahead row.
    pub take: u64,
}

impl PageSpec {
    /// Spec for a newest-first page below `cursor`, fetching one row past
    /// `limit` so the caller can tell whether another page exists.
    #[must_use]
    pub fn below_cursor(
        subject_id: impl Into<String>,
        direction: MemberDirection,
        cursor: Option<String>,
        limit: u64,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            direction,
            bounds: IdBounds::until(cursor),
            take: limit + 1,
        }
    }

    /// Apply bounds, ordering and row count to `query`.
    #[must_use]
    pub fn apply<E, C>(&self, query: Select<E>, id_column: C) -> Select<E>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        self.bounds.apply(query, id_column).limit(self.take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Note, note};
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(bounds: &IdBounds) -> String {
        bounds
            .apply(Note::find(), note::Column::Id)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_until_only_reads_newest_first() {
        let query = sql(&IdBounds::until(Some("0abc".to_string())));
        assert!(query.contains(r#""note"."id" < '0abc'"#));
        assert!(query.contains(r#"ORDER BY "note"."id" DESC"#));
    }

    #[test]
    fn test_since_only_reads_oldest_first() {
        let bounds = IdBounds {
            since_id: Some("0abc".to_string()),
            until_id: None,
        };
        let query = sql(&bounds);
        assert!(query.contains(r#""note"."id" > '0abc'"#));
        assert!(query.contains(r#"ORDER BY "note"."id" ASC"#));
    }

    #[test]
    fn test_range_reads_newest_first() {
        let bounds = IdBounds {
            since_id: Some("0aaa".to_string()),
            until_id: Some("0zzz".to_string()),
        };
        assert!(!bounds.is_ascending());
        let query = sql(&bounds);
        assert!(query.contains(r#""note"."id" > '0aaa'"#));
        assert!(query.contains(r#""note"."id" < '0zzz'"#));
        assert!(query.contains("DESC"));
    }

    #[test]
    fn test_below_cursor_fetches_one_extra_row() {
        let spec = PageSpec::below_cursor("user1", MemberDirection::Followers, None, 10);
        assert_eq!(spec.take, 11);
        assert_eq!(spec.bounds, IdBounds::default());
    }
}
