//! Follower/following list disclosure rules.

use yoake_db::entities::user_profile::FfVisibility;

/// How much the caller is trusted with respect to a subject user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// No relationship with the subject: signed out, not following, or an
    /// `ActivityPub` fetch.
    Anonymous,
    /// Signed in and following the subject.
    Follower,
    /// The subject themselves.
    Owner,
    /// A moderator or administrator.
    Moderator,
}

/// What a caller may learn about a subject's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclosure {
    /// Count to expose; zero when the list is hidden.
    pub total: u64,
    /// Whether list contents may be served.
    pub pages_allowed: bool,
}

impl Disclosure {
    /// Nothing disclosed: zero count, no pages.
    #[must_use]
    pub const fn withheld() -> Self {
        Self {
            total: 0,
            pages_allowed: false,
        }
    }
}

/// Whether `viewer` may see a list guarded by `policy`.
#[must_use]
pub const fn can_view(policy: FfVisibility, viewer: Viewer) -> bool {
    match policy {
        FfVisibility::Public => true,
        FfVisibility::Followers => !matches!(viewer, Viewer::Anonymous),
        FfVisibility::Private => matches!(viewer, Viewer::Owner | Viewer::Moderator),
    }
}

/// Apply `policy` to a list of `total` entries for `viewer`.
#[must_use]
pub const fn disclose(policy: FfVisibility, viewer: Viewer, total: u64) -> Disclosure {
    if can_view(policy, viewer) {
        Disclosure {
            total,
            pages_allowed: true,
        }
    } else {
        Disclosure::withheld()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_is_visible_to_everyone() {
        let d = disclose(FfVisibility::Public, Viewer::Anonymous, 15);
        assert_eq!(d.total, 15);
        assert!(d.pages_allowed);
    }

    #[test]
    fn test_anonymous_sees_nothing_of_restricted_lists() {
        for policy in [FfVisibility::Followers, FfVisibility::Private] {
            let d = disclose(policy, Viewer::Anonymous, 15);
            assert_eq!(d.total, 0);
            assert!(!d.pages_allowed);
        }
    }

    #[test]
    fn test_followers_policy() {
        assert!(can_view(FfVisibility::Followers, Viewer::Follower));
        assert!(can_view(FfVisibility::Followers, Viewer::Owner));
        assert!(can_view(FfVisibility::Followers, Viewer::Moderator));
    }

    #[test]
    fn test_private_policy() {
        assert!(!can_view(FfVisibility::Private, Viewer::Follower));
        assert!(can_view(FfVisibility::Private, Viewer::Owner));
        assert!(can_view(FfVisibility::Private, Viewer::Moderator));
    }
}
