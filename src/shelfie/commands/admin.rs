//! Catalog administration. Every command here checks the stored role before
//! touching the network; the backend checks again.

use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelfieError};
use crate::model::{Book, BookId, BookInput, GenreId, GenreInput};
use crate::query::{mutations, queries, QueryCache};
use crate::route::Route;
use crate::session::{self, SessionStore};
use crate::transport::Transport;

pub const ADMIN_ONLY: &str = "Chỉ quản trị viên mới có quyền truy cập";

/// Fields to change on a book; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub isbn13: Option<String>,
    pub author_id: Option<i64>,
    pub genre_id: Option<i64>,
    pub description: Option<String>,
    pub page_count: Option<u32>,
    pub publication_year: Option<i32>,
    pub cover_url: Option<String>,
}

impl BookPatch {
    fn apply(self, book: &Book) -> BookInput {
        BookInput {
            title: self.title.unwrap_or_else(|| book.title.clone()),
            isbn13: self.isbn13.or_else(|| book.isbn13.clone()),
            author_id: self.author_id.or(book.author_id),
            genre_id: self.genre_id.or(book.genre_id),
            description: self.description.or_else(|| book.description.clone()),
            page_count: self.page_count.unwrap_or(book.page_count),
            publication_year: self.publication_year.or(book.publication_year),
            cover_url: self.cover_url.or_else(|| book.cover_url.clone()),
        }
    }
}

pub fn require_admin<S: SessionStore>(session: &S) -> Result<()> {
    if session::is_admin(session) {
        Ok(())
    } else {
        Err(ShelfieError::Forbidden(ADMIN_ONLY.to_string()))
    }
}

/// The admin page: the whole catalog and its genres.
pub fn dashboard<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    let books = queries::books(client, cache)?;
    let genres = queries::genres(client, cache)?;
    client.location().navigate(Route::Admin);
    Ok(CmdResult::default()
        .with_message(CmdMessage::info(format!(
            "{} sách, {} thể loại",
            books.len(),
            genres.len()
        )))
        .with_books(books)
        .with_genres(genres)
        .with_location(Route::Admin))
}

pub fn create_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &BookInput,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    let book = mutations::create_book(client, cache, input)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Đã thêm sách \"{}\" (#{})",
            book.title, book.book_id
        )))
        .with_books(vec![book]))
}

pub fn update_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
    patch: BookPatch,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    let current = queries::book(client, cache, id)?;
    let input = patch.apply(&current);
    mutations::update_book(client, cache, id, &input)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Đã cập nhật sách #{}",
        id
    ))))
}

pub fn delete_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    mutations::delete_book(client, cache, id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!("Đã xóa sách #{}", id))))
}

pub fn create_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &GenreInput,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    let genre = mutations::create_genre(client, cache, input)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Đã thêm thể loại \"{}\"",
            genre.name
        )))
        .with_genres(vec![genre]))
}

pub fn update_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
    input: &GenreInput,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    mutations::update_genre(client, cache, id, input)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Đã cập nhật thể loại #{}",
        id
    ))))
}

pub fn delete_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
) -> Result<CmdResult> {
    require_admin(client.session())?;
    mutations::delete_genre(client, cache, id)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Đã xóa thể loại #{}",
        id
    ))))
}
