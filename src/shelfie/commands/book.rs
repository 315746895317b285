//! The book page: details, reviews and the review area.

use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult, PageView};
use crate::derived;
use crate::eligibility::ReviewEligibility;
use crate::error::Result;
use crate::model::{AddToLibraryInput, BookId, ReadingStatus};
use crate::query::{mutations, QueryCache};
use crate::route::Route;
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn show<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
) -> Result<CmdResult> {
    let detail = derived::book_detail(client, cache, id)?;
    client.location().navigate(Route::BookDetail(id));

    let mut result = CmdResult::default().with_location(Route::BookDetail(id));
    let message = match &detail.eligibility {
        Some(eligibility) => {
            let text = eligibility.prompt();
            match eligibility {
                ReviewEligibility::CanWrite | ReviewEligibility::AlreadyReviewed(_) => {
                    CmdMessage::info(text)
                }
                ReviewEligibility::PermissionMismatch {
                    reason: Some(reason),
                } => CmdMessage::error(format!("{} ({})", text, reason)),
                ReviewEligibility::PermissionMismatch { reason: None } => CmdMessage::error(text),
                _ => CmdMessage::warning(text),
            }
        }
        None => CmdMessage::info("Đăng nhập để viết đánh giá."),
    };
    result.add_message(message);
    Ok(result.with_page(PageView::Book(Box::new(detail))))
}

/// Act on the review area's prompt: put the book in the library as read, or
/// mark it read. Both go through the shared library mutations, so the
/// eligibility shown afterwards comes from fresh reads.
pub fn resolve_prompt<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
) -> Result<CmdResult> {
    let detail = derived::book_detail(client, cache, id)?;
    let action = match detail.eligibility {
        Some(ReviewEligibility::AddToLibrary) => {
            mutations::add_to_library(
                client,
                cache,
                &AddToLibraryInput {
                    book_id: id,
                    status_id: ReadingStatus::Read,
                    shelf_id: None,
                },
            )?;
            Some(format!("Đã thêm \"{}\" vào thư viện", detail.book.title))
        }
        Some(ReviewEligibility::MarkAsRead { .. }) => {
            mutations::mark_as_read(client, cache, id)?;
            Some(format!("Đã đánh dấu \"{}\" là đã đọc", detail.book.title))
        }
        _ => None,
    };

    let mut result = show(client, cache, id)?;
    let message = match action {
        Some(done) => CmdMessage::success(done),
        None => CmdMessage::info("Không có gì cần làm"),
    };
    result.messages.insert(0, message);
    Ok(result)
}
