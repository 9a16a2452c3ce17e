//! Follower and following collections of local users.
//!
//! A collection is addressed by its subject (a local user) and a
//! [`MemberDirection`]. Access follows the subject's list visibility
//! setting: the total is only disclosed, and pages only served, to viewers
//! the setting admits. Pages are newest first and carry an exclusive id
//! cursor for the next page.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use yoake_common::{AppError, AppResult};
use yoake_db::{
    MemberDirection, PageSpec,
    entities::user,
    repositories::{FollowingRepository, UserProfileRepository, UserRepository},
};

use crate::pagination::{COLLECTION_PAGE_LIMIT, Page};
use crate::visibility::{Disclosure, Viewer, disclose};

/// One member record: the relationship row id and the member's user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: String,
    pub member_id: String,
}

/// Source of member records.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Rows matching `spec`, ordered as its bounds dictate, at most `spec.take`.
    async fn fetch_page(&self, spec: &PageSpec) -> AppResult<Vec<MemberRow>>;
}

/// [`MemberStore`] backed by the `following` table.
#[derive(Clone)]
pub struct FollowingMemberStore {
    following_repo: FollowingRepository,
}

impl FollowingMemberStore {
    #[must_use]
    pub const fn new(following_repo: FollowingRepository) -> Self {
        Self { following_repo }
    }
}

#[async_trait]
impl MemberStore for FollowingMemberStore {
    async fn fetch_page(&self, spec: &PageSpec) -> AppResult<Vec<MemberRow>> {
        let rows = self.following_repo.fetch_page(spec).await?;

        Ok(rows
            .into_iter()
            .map(|row| MemberRow {
                member_id: match spec.direction {
                    MemberDirection::Followers => row.follower_id,
                    MemberDirection::Following => row.followee_id,
                },
                id: row.id,
            })
            .collect())
    }
}

/// Collection index: the disclosed size and whether pages may be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub subject_id: String,
    pub total: u64,
    pub pages_allowed: bool,
}

/// One page of resolved members.
#[derive(Debug, Clone)]
pub struct CollectionPage {
    pub subject_id: String,
    pub total: u64,
    /// Members in row order, newest relationship first.
    pub members: Vec<user::Model>,
    /// Cursor for the following page, if there is one.
    pub next_cursor: Option<String>,
}

/// Serves follower/following collections.
#[derive(Clone)]
pub struct CollectionService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    store: Arc<dyn MemberStore>,
}

impl CollectionService {
    /// Create a new collection service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        store: Arc<dyn MemberStore>,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            store,
        }
    }

    /// Size of the collection as far as `viewer` may know it.
    pub async fn summary(
        &self,
        subject_id: &str,
        direction: MemberDirection,
        viewer: Viewer,
    ) -> AppResult<CollectionSummary> {
        let subject = self.subject(subject_id).await?;
        let disclosure = self.disclosure(&subject, direction, viewer).await?;

        Ok(CollectionSummary {
            subject_id: subject.id,
            total: disclosure.total,
            pages_allowed: disclosure.pages_allowed,
        })
    }

    /// The page of members strictly below `cursor`, newest first.
    pub async fn page(
        &self,
        subject_id: &str,
        direction: MemberDirection,
        cursor: Option<String>,
        viewer: Viewer,
    ) -> AppResult<CollectionPage> {
        let subject = self.subject(subject_id).await?;
        let disclosure = self.disclosure(&subject, direction, viewer).await?;

        if !disclosure.pages_allowed {
            return Err(AppError::Forbidden(format!(
                "{direction:?} of {} are not public",
                subject.id
            )));
        }

        let spec = PageSpec::below_cursor(&subject.id, direction, cursor, COLLECTION_PAGE_LIMIT);
        let rows = self.store.fetch_page(&spec).await?;
        let page = Page::from_look_ahead(rows, page_len(), |row: &MemberRow| row.id.as_str());

        let members = try_join_all(page.items.iter().map(|row| self.member(&row.member_id))).await?;

        tracing::debug!(
            subject_id = %subject.id,
            direction = ?direction,
            members = members.len(),
            has_more = page.has_more(),
            "Rendered collection page"
        );

        Ok(CollectionPage {
            subject_id: subject.id,
            total: disclosure.total,
            members,
            next_cursor: page.next_cursor,
        })
    }

    /// A subject without a profile row discloses nothing.
    async fn disclosure(
        &self,
        subject: &user::Model,
        direction: MemberDirection,
        viewer: Viewer,
    ) -> AppResult<Disclosure> {
        let disclosure = match self.profile_repo.ff_visibility(&subject.id).await? {
            Some(policy) => disclose(policy, viewer, declared_total(subject, direction)),
            None => {
                tracing::warn!(user_id = %subject.id, "Local user has no profile row");
                Disclosure::withheld()
            }
        };
        Ok(disclosure)
    }

    async fn subject(&self, subject_id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_local_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {subject_id}")))
    }

    async fn member(&self, member_id: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("member {member_id} has no user record")))
    }
}

fn declared_total(subject: &user::Model, direction: MemberDirection) -> u64 {
    let count = match direction {
        MemberDirection::Followers => subject.followers_count,
        MemberDirection::Following => subject.following_count,
    };
    u64::try_from(count).unwrap_or(0)
}

fn page_len() -> usize {
    usize::try_from(COLLECTION_PAGE_LIMIT).unwrap_or(usize::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Mutex;
    use yoake_db::{entities::user_profile::FfVisibility, test_utils};

    /// In-memory member table with `id < until` / newest-first semantics.
    struct FakeStore {
        rows: Vec<MemberRow>,
        calls: Mutex<Vec<PageSpec>>,
    }

    impl FakeStore {
        /// Members `01..=n`, where a higher number is a newer relationship.
        fn with_members(n: usize) -> Arc<Self> {
            let rows = (1..=n)
                .map(|i| MemberRow {
                    id: format!("{i:02}"),
                    member_id: format!("m{i:02}"),
                })
                .collect();
            Arc::new(Self {
                rows,
                calls: Mutex::new(vec![]),
            })
        }

        fn calls(&self) -> Vec<PageSpec> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MemberStore for FakeStore {
        async fn fetch_page(&self, spec: &PageSpec) -> AppResult<Vec<MemberRow>> {
            self.calls.lock().unwrap().push(spec.clone());

            let mut rows: Vec<MemberRow> = self
                .rows
                .iter()
                .filter(|r| spec.bounds.until_id.as_ref().is_none_or(|until| &r.id < until))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            rows.truncate(usize::try_from(spec.take).unwrap());
            Ok(rows)
        }
    }

    struct FailingStore;

    #[async_trait]
    impl MemberStore for FailingStore {
        async fn fetch_page(&self, _spec: &PageSpec) -> AppResult<Vec<MemberRow>> {
            Err(AppError::Database("connection refused".to_string()))
        }
    }

    fn subject(followers: i32) -> user::Model {
        let mut user = test_utils::user("subject", "alice");
        user.followers_count = followers;
        user.following_count = 2;
        user
    }

    /// Mock answering one page request: subject, profile, then each member
    /// the store is expected to return.
    fn page_mock(mut db: MockDatabase, policy: FfVisibility, member_ids: &[String]) -> MockDatabase {
        db = db
            .append_query_results([[subject(15)]])
            .append_query_results([[test_utils::profile("subject", policy)]]);
        for id in member_ids {
            db = db.append_query_results([[test_utils::user(id, id)]]);
        }
        db
    }

    fn service(db: DatabaseConnection, store: Arc<dyn MemberStore>) -> CollectionService {
        let db = Arc::new(db);
        CollectionService::new(
            UserRepository::new(Arc::clone(&db)),
            UserProfileRepository::new(Arc::clone(&db)),
            store,
        )
    }

    fn member_ids(range: impl DoubleEndedIterator<Item = usize>) -> Vec<String> {
        range.rev().map(|i| format!("m{i:02}")).collect()
    }

    fn ids_of(page: &CollectionPage) -> Vec<String> {
        page.members.iter().map(|m| m.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_summary_public() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[subject(15)]])
            .append_query_results([[test_utils::profile("subject", FfVisibility::Public)]])
            .into_connection();

        let summary = service(db, FakeStore::with_members(15))
            .summary("subject", MemberDirection::Followers, Viewer::Anonymous)
            .await
            .unwrap();

        assert_eq!(summary.total, 15);
        assert!(summary.pages_allowed);
    }

    #[tokio::test]
    async fn test_summary_following_uses_following_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[subject(15)]])
            .append_query_results([[test_utils::profile("subject", FfVisibility::Public)]])
            .into_connection();

        let summary = service(db, FakeStore::with_members(2))
            .summary("subject", MemberDirection::Following, Viewer::Anonymous)
            .await
            .unwrap();

        assert_eq!(summary.total, 2);
    }

    #[tokio::test]
    async fn test_restricted_policy_hides_total_and_pages() {
        for policy in [FfVisibility::Followers, FfVisibility::Private] {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subject(15)]])
                .append_query_results([[test_utils::profile("subject", policy)]])
                .append_query_results([[subject(15)]])
                .append_query_results([[test_utils::profile("subject", policy)]])
                .into_connection();
            let store = FakeStore::with_members(15);
            let service = service(db, store.clone());

            let summary = service
                .summary("subject", MemberDirection::Followers, Viewer::Anonymous)
                .await
                .unwrap();
            assert_eq!(summary.total, 0);
            assert!(!summary.pages_allowed);

            let page = service
                .page(
                    "subject",
                    MemberDirection::Followers,
                    Some("07".to_string()),
                    Viewer::Anonymous,
                )
                .await;
            assert!(matches!(page, Err(AppError::Forbidden(_))));
            assert!(store.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_profile_discloses_nothing() {
        let no_profile = Vec::<yoake_db::entities::user_profile::Model>::new();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[subject(15)]])
            .append_query_results([no_profile.clone()])
            .append_query_results([[subject(15)]])
            .append_query_results([no_profile])
            .into_connection();
        let store = FakeStore::with_members(15);
        let service = service(db, store.clone());

        let summary = service
            .summary("subject", MemberDirection::Followers, Viewer::Anonymous)
            .await
            .unwrap();
        assert_eq!(summary.total, 0);
        assert!(!summary.pages_allowed);

        let page = service
            .page("subject", MemberDirection::Followers, None, Viewer::Anonymous)
            .await;
        assert!(matches!(page, Err(AppError::Forbidden(_))));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_subject_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let store = FakeStore::with_members(3);

        let result = service(db, store.clone())
            .page("nobody", MemberDirection::Followers, None, Viewer::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fifteen_members_split_into_two_pages() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let db = page_mock(db, FfVisibility::Public, &member_ids(6..=15));
        let db = page_mock(db, FfVisibility::Public, &member_ids(1..=5));
        let store = FakeStore::with_members(15);
        let service = service(db.into_connection(), store.clone());

        let first = service
            .page("subject", MemberDirection::Followers, None, Viewer::Anonymous)
            .await
            .unwrap();
        assert_eq!(ids_of(&first), member_ids(6..=15));
        assert_eq!(first.next_cursor.as_deref(), Some("06"));
        assert_eq!(first.total, 15);

        let second = service
            .page(
                "subject",
                MemberDirection::Followers,
                first.next_cursor.clone(),
                Viewer::Anonymous,
            )
            .await
            .unwrap();
        assert_eq!(ids_of(&second), member_ids(1..=5));
        assert!(second.next_cursor.is_none());

        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].bounds.until_id, None);
        assert_eq!(calls[1].bounds.until_id.as_deref(), Some("06"));
        assert!(calls.iter().all(|c| c.take == COLLECTION_PAGE_LIMIT + 1));
    }

    #[tokio::test]
    async fn test_next_links_visit_every_member_once() {
        let expected_pages = [member_ids(16..=25), member_ids(6..=15), member_ids(1..=5)];
        let mut db = MockDatabase::new(DatabaseBackend::Postgres);
        for ids in &expected_pages {
            db = page_mock(db, FfVisibility::Public, ids);
        }
        let store = FakeStore::with_members(25);
        let service = service(db.into_connection(), store.clone());

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = service
                .page("subject", MemberDirection::Followers, cursor, Viewer::Anonymous)
                .await
                .unwrap();
            seen.extend(ids_of(&page));
            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        assert_eq!(seen, member_ids(1..=25));
        let cursors: Vec<Option<String>> = store.calls().into_iter().map(|c| c.bounds.until_id).collect();
        assert_eq!(cursors, [None, Some("16".to_string()), Some("06".to_string())]);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_trailing_cursor() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let db = page_mock(db, FfVisibility::Public, &member_ids(11..=20));
        let db = page_mock(db, FfVisibility::Public, &member_ids(1..=10));
        let service = service(db.into_connection(), FakeStore::with_members(20));

        let first = service
            .page("subject", MemberDirection::Followers, None, Viewer::Anonymous)
            .await
            .unwrap();
        assert_eq!(first.next_cursor.as_deref(), Some("11"));

        let last = service
            .page("subject", MemberDirection::Followers, first.next_cursor, Viewer::Anonymous)
            .await
            .unwrap();
        assert_eq!(last.members.len(), 10);
        assert!(last.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_same_cursor_yields_same_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let db = page_mock(db, FfVisibility::Public, &member_ids(1..=5));
        let db = page_mock(db, FfVisibility::Public, &member_ids(1..=5));
        let service = service(db.into_connection(), FakeStore::with_members(15));

        let cursor = Some("06".to_string());
        let a = service
            .page("subject", MemberDirection::Followers, cursor.clone(), Viewer::Anonymous)
            .await
            .unwrap();
        let b = service
            .page("subject", MemberDirection::Followers, cursor, Viewer::Anonymous)
            .await
            .unwrap();

        assert_eq!(ids_of(&a), ids_of(&b));
        assert_eq!(a.next_cursor, b.next_cursor);
    }

    #[tokio::test]
    async fn test_missing_member_fails_whole_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[subject(2)]])
            .append_query_results([[test_utils::profile("subject", FfVisibility::Public)]])
            .append_query_results([[test_utils::user("m02", "m02")]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service(db, FakeStore::with_members(2))
            .page("subject", MemberDirection::Followers, None, Viewer::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[subject(2)]])
            .append_query_results([[test_utils::profile("subject", FfVisibility::Public)]])
            .into_connection();

        let result = service(db, Arc::new(FailingStore))
            .page("subject", MemberDirection::Followers, None, Viewer::Anonymous)
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_following_store_maps_direction() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_utils::following("f1", "fan", "subject")]])
                .append_query_results([[test_utils::following("f2", "subject", "idol")]])
                .into_connection(),
        );
        let store = FollowingMemberStore::new(FollowingRepository::new(db));

        let followers = store
            .fetch_page(&PageSpec::below_cursor("subject", MemberDirection::Followers, None, 10))
            .await
            .unwrap();
        let following = store
            .fetch_page(&PageSpec::below_cursor("subject", MemberDirection::Following, None, 10))
            .await
            .unwrap();

        assert_eq!(followers[0].member_id, "fan");
        assert_eq!(following[0].member_id, "idol");
        assert_eq!(following[0].id, "f2");
    }
}
