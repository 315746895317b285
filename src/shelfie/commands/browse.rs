use crate::client::ApiClient;
use crate::commands::{CmdMessage, CmdResult, PageView};
use crate::derived;
use crate::error::Result;
use crate::model::{AuthorId, GenreId};
use crate::query::{queries, QueryCache};
use crate::services::{authors, books};
use crate::session::SessionStore;
use crate::transport::Transport;

#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub search: Option<String>,
    pub genre_id: Option<GenreId>,
    pub author_id: Option<AuthorId>,
    pub limit: Option<usize>,
}

/// The catalog, filtered on the client: the backend always returns every book.
pub fn books<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    filter: &BookFilter,
) -> Result<CmdResult> {
    let all = queries::books(client, cache)?;
    let mut found = match &filter.search {
        Some(term) => books::search_books(&all, term),
        None => all,
    };
    if let Some(genre_id) = filter.genre_id {
        found = books::books_by_genre(&found, genre_id);
    }
    if let Some(author_id) = filter.author_id {
        found = books::books_by_author(&found, author_id);
    }
    if let Some(limit) = filter.limit {
        found.truncate(limit);
    }

    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("Không tìm thấy sách nào"));
    }
    Ok(result.with_books(found))
}

pub fn authors<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    search: Option<&str>,
) -> Result<CmdResult> {
    let all = queries::authors(client, cache)?;
    let found = authors::search_authors(&all, search.unwrap_or(""));
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("Không tìm thấy tác giả nào"));
    }
    Ok(result.with_authors(found))
}

pub fn genres<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<CmdResult> {
    let mut genres = queries::genres(client, cache)?;
    genres.sort_by_key(|g| g.name.to_lowercase());
    Ok(CmdResult::default().with_genres(genres))
}

pub fn author<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: AuthorId,
) -> Result<CmdResult> {
    let detail = derived::author_detail(client, cache, id)?;
    Ok(CmdResult::default().with_page(PageView::Author(detail)))
}

pub fn genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
) -> Result<CmdResult> {
    let detail = derived::genre_detail(client, cache, id)?;
    Ok(CmdResult::default().with_page(PageView::Genre(detail)))
}
