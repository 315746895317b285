//! # Review Eligibility
//!
//! Whether the book page offers "write a review" depends on three answers
//! fetched independently, which can be stale or contradict each other:
//!
//! 1. the backend's own `can-review` flag,
//! 2. the library membership check (does the book exist in the library, and
//!    with which status),
//! 3. the reader's existing review, if any.
//!
//! [`decide`] is a pure function over the three query states. Nothing is
//! stored; it is recomputed from whatever the queries currently hold.
//!
//! Failures are soft. A failed `can-review` counts as "no", a failed
//! review lookup counts as "no review", and a failed membership check sends
//! the reader to "add to library".

use crate::model::{CanReview, LibraryCheck, ReadingStatus, Review};

/// The state of one read, as seen by a page.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<crate::error::Result<T>> for QueryState<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => QueryState::Ready(value),
            Err(e) => QueryState::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewEligibility {
    /// At least one answer is still outstanding; offer no actions.
    Loading,
    /// The reader already reviewed this book; offer editing instead.
    AlreadyReviewed(Review),
    /// The book is not in the library, or membership could not be checked.
    AddToLibrary,
    /// Show the review form.
    CanWrite,
    /// The book must be marked as read first.
    MarkAsRead { current: ReadingStatus },
    /// The book is marked read and the backend still says no. The two
    /// backend signals disagree; the reader is asked to refresh.
    PermissionMismatch { reason: Option<String> },
}

impl ReviewEligibility {
    pub fn can_write(&self) -> bool {
        matches!(self, ReviewEligibility::CanWrite)
    }

    /// Prompt shown on the book page.
    pub fn prompt(&self) -> String {
        match self {
            ReviewEligibility::Loading => "Đang kiểm tra quyền đánh giá...".to_string(),
            ReviewEligibility::AlreadyReviewed(_) => {
                "Bạn đã đánh giá cuốn sách này. Bạn có thể chỉnh sửa đánh giá của mình.".to_string()
            }
            ReviewEligibility::AddToLibrary => {
                "Thêm sách vào thư viện và đánh dấu \"Đã đọc\" để viết đánh giá.".to_string()
            }
            ReviewEligibility::CanWrite => "Bạn có thể viết đánh giá cho cuốn sách này.".to_string(),
            ReviewEligibility::MarkAsRead { current } => format!(
                "Trạng thái hiện tại: \"{}\". Đánh dấu \"Đã đọc\" để viết đánh giá.",
                current.label()
            ),
            ReviewEligibility::PermissionMismatch { .. } => {
                "Không thể xác minh quyền đánh giá. Vui lòng tải lại.".to_string()
            }
        }
    }
}

/// Decide what the review area shows. First matching rule wins:
///
/// 1. anything loading → [`ReviewEligibility::Loading`]
/// 2. an existing review → [`ReviewEligibility::AlreadyReviewed`], whatever the rest says
/// 3. membership failed or `Exists = false` → [`ReviewEligibility::AddToLibrary`]
/// 4. `can-review` says yes → [`ReviewEligibility::CanWrite`]
/// 5. status not read → [`ReviewEligibility::MarkAsRead`]; status read but
///    denied → [`ReviewEligibility::PermissionMismatch`]
pub fn decide(
    can_review: &QueryState<CanReview>,
    membership: &QueryState<LibraryCheck>,
    my_review: &QueryState<Option<Review>>,
) -> ReviewEligibility {
    if can_review.is_loading() || membership.is_loading() || my_review.is_loading() {
        return ReviewEligibility::Loading;
    }

    if let QueryState::Ready(Some(review)) = my_review {
        return ReviewEligibility::AlreadyReviewed(review.clone());
    }

    let check = match membership {
        QueryState::Ready(check) if check.exists => check,
        _ => return ReviewEligibility::AddToLibrary,
    };

    let permission = can_review.ready();
    if permission.is_some_and(|p| p.allowed) {
        return ReviewEligibility::CanWrite;
    }

    let status = check
        .status_id
        .or_else(|| check.user_book.as_ref().map(|ub| ub.status_id));
    match status {
        Some(ReadingStatus::Read) => {
            tracing::warn!(
                "book is marked read but the backend denies review permission"
            );
            ReviewEligibility::PermissionMismatch {
                reason: permission.and_then(|p| p.reason.clone()),
            }
        }
        Some(current) => ReviewEligibility::MarkAsRead { current },
        // In the library with no status at all: the closest prompt is the
        // first status.
        None => ReviewEligibility::MarkAsRead {
            current: ReadingStatus::WantToRead,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(flag: bool) -> QueryState<CanReview> {
        QueryState::Ready(CanReview {
            allowed: flag,
            reason: None,
        })
    }

    fn member(status: ReadingStatus) -> QueryState<LibraryCheck> {
        QueryState::Ready(LibraryCheck {
            exists: true,
            status_id: Some(status),
            ..Default::default()
        })
    }

    fn absent() -> QueryState<LibraryCheck> {
        QueryState::Ready(LibraryCheck::default())
    }

    fn existing_review() -> Review {
        Review {
            review_id: 9,
            book_id: 1,
            book_title: None,
            user_id: Some(42),
            user_name: Some("minh".into()),
            rating: 4,
            content: "Hay".into(),
            is_public: true,
            comment_count: 0,
            can_edit: true,
            can_delete: true,
            created_at: None,
        }
    }

    #[test]
    fn any_loading_input_is_loading() {
        assert_eq!(
            decide(&QueryState::Loading, &absent(), &QueryState::Ready(None)),
            ReviewEligibility::Loading
        );
        assert_eq!(
            decide(&allowed(true), &QueryState::Loading, &QueryState::Ready(None)),
            ReviewEligibility::Loading
        );
        assert_eq!(
            decide(
                &allowed(true),
                &member(ReadingStatus::Read),
                &QueryState::Loading
            ),
            ReviewEligibility::Loading
        );
    }

    #[test]
    fn currently_reading_with_permission_shows_form() {
        let result = decide(
            &allowed(true),
            &member(ReadingStatus::CurrentlyReading),
            &QueryState::Ready(None),
        );
        assert_eq!(result, ReviewEligibility::CanWrite);
    }

    #[test]
    fn existing_review_overrides_everything() {
        let review = existing_review();
        let mine = QueryState::Ready(Some(review.clone()));
        for can in [allowed(true), allowed(false), QueryState::Failed("x".into())] {
            for membership in [
                absent(),
                member(ReadingStatus::WantToRead),
                QueryState::Failed("down".into()),
            ] {
                assert_eq!(
                    decide(&can, &membership, &mine),
                    ReviewEligibility::AlreadyReviewed(review.clone())
                );
            }
        }
    }

    #[test]
    fn not_in_library_asks_to_add_regardless_of_permission() {
        for can in [allowed(true), allowed(false)] {
            assert_eq!(
                decide(&can, &absent(), &QueryState::Ready(None)),
                ReviewEligibility::AddToLibrary
            );
        }
    }

    #[test]
    fn failed_membership_asks_to_add() {
        assert_eq!(
            decide(
                &allowed(true),
                &QueryState::Failed("500".into()),
                &QueryState::Ready(None)
            ),
            ReviewEligibility::AddToLibrary
        );
    }

    #[test]
    fn unread_book_asks_to_mark_read() {
        assert_eq!(
            decide(
                &allowed(false),
                &member(ReadingStatus::WantToRead),
                &QueryState::Ready(None)
            ),
            ReviewEligibility::MarkAsRead {
                current: ReadingStatus::WantToRead
            }
        );
    }

    #[test]
    fn read_but_denied_is_a_mismatch() {
        let can = QueryState::Ready(CanReview {
            allowed: false,
            reason: Some("policy".into()),
        });
        assert_eq!(
            decide(&can, &member(ReadingStatus::Read), &QueryState::Ready(None)),
            ReviewEligibility::PermissionMismatch {
                reason: Some("policy".into())
            }
        );
    }

    #[test]
    fn failed_permission_check_counts_as_denied() {
        let failed = QueryState::Failed("timeout".into());
        assert_eq!(
            decide(
                &failed,
                &member(ReadingStatus::Read),
                &QueryState::Ready(None)
            ),
            ReviewEligibility::PermissionMismatch { reason: None }
        );
    }

    #[test]
    fn failed_review_lookup_counts_as_none() {
        assert_eq!(
            decide(
                &allowed(true),
                &member(ReadingStatus::Read),
                &QueryState::Failed("oops".into())
            ),
            ReviewEligibility::CanWrite
        );
    }

    #[test]
    fn status_falls_back_to_embedded_record() {
        let check = LibraryCheck {
            exists: true,
            status_id: None,
            shelf_id: None,
            user_book: Some(crate::model::UserBook {
                user_book_id: None,
                book_id: 1,
                book: None,
                status_id: ReadingStatus::CurrentlyReading,
                shelf_id: None,
                shelf_name: None,
                current_page: 0,
                progress: 0.0,
                notes: None,
                start_date: None,
                finish_date: None,
            }),
        };
        assert_eq!(
            decide(
                &allowed(false),
                &QueryState::Ready(check),
                &QueryState::Ready(None)
            ),
            ReviewEligibility::MarkAsRead {
                current: ReadingStatus::CurrentlyReading
            }
        );
    }

    #[test]
    fn prompt_names_the_current_status() {
        let prompt = ReviewEligibility::MarkAsRead {
            current: ReadingStatus::CurrentlyReading,
        }
        .prompt();
        assert!(prompt.contains("Đang đọc"));
    }
}
