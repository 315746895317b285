use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{AddToLibraryInput, BookId, ReadingStatus, ShelfId};
use crate::progress;
use crate::query::{mutations, queries, QueryCache};
use crate::route::Route;
use crate::session::SessionStore;
use crate::transport::Transport;
use crate::validation;

#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryFilter {
    pub status: Option<ReadingStatus>,
    pub shelf_id: Option<ShelfId>,
}

pub fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    filter: LibraryFilter,
) -> Result<CmdResult> {
    let entries: Vec<_> = queries::library(client, cache)?
        .into_iter()
        .filter(|e| filter.status.map_or(true, |s| e.status_id == s))
        .filter(|e| filter.shelf_id.map_or(true, |id| e.shelf_id == Some(id)))
        .collect();
    client.location().navigate(Route::Library);

    let mut result = CmdResult::default().with_location(Route::Library);
    if entries.is_empty() {
        result.add_message(CmdMessage::info("Thư viện của bạn chưa có sách nào"));
    }
    Ok(result.with_library(entries))
}

pub fn add<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    status: ReadingStatus,
    shelf_id: Option<ShelfId>,
) -> Result<CmdResult> {
    let book = queries::book(client, cache, book_id)?;
    mutations::add_to_library(
        client,
        cache,
        &AddToLibraryInput {
            book_id,
            status_id: status,
            shelf_id,
        },
    )?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Đã thêm \"{}\" vào thư viện ({})",
        book.title,
        status.label()
    ))))
}

pub fn remove<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<CmdResult> {
    mutations::remove_from_library(client, cache, book_id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Đã xóa sách #{} khỏi thư viện",
        book_id
    ))))
}

pub fn set_status<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    status: ReadingStatus,
) -> Result<CmdResult> {
    mutations::update_status(client, cache, book_id, status)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Trạng thái sách #{}: {}",
        book_id,
        status.label()
    ))))
}

/// Record the current page. A negative page is rejected before anything is
/// sent; the book is then read so the page can be checked against its
/// length. Nothing is written when either check fails.
pub fn set_progress<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    current_page: i64,
    notes: Option<String>,
) -> Result<CmdResult> {
    validation::progress(current_page, 0)?;
    let book = queries::book(client, cache, book_id)?;
    mutations::update_progress(client, cache, book_id, current_page, book.page_count, notes)?;

    let percent = progress::reading_progress(
        ReadingStatus::CurrentlyReading,
        current_page.max(0) as u32,
        book.page_count,
        0.0,
    );
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "\"{}\": trang {}/{} ({}%)",
        book.title, current_page, book.page_count, percent
    ))))
}

pub fn move_to<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    shelf_id: Option<ShelfId>,
) -> Result<CmdResult> {
    mutations::move_to_shelf(client, cache, book_id, shelf_id)?;
    let text = match shelf_id {
        Some(id) => format!("Đã chuyển sách #{} sang kệ #{}", book_id, id),
        None => format!("Đã bỏ sách #{} khỏi kệ", book_id),
    };
    Ok(CmdResult::default().with_message(CmdMessage::success(text)))
}
