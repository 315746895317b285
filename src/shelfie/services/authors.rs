use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{Author, AuthorId, Book};
use crate::session::SessionStore;
use crate::transport::Transport;
use std::collections::HashMap;

pub fn get_authors<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
) -> Result<Vec<Author>> {
    client.get("/api/Author")
}

pub fn get_author<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: AuthorId,
) -> Result<Author> {
    client.get(&format!("/api/Author/{}", id))
}

pub fn get_author_books<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: AuthorId,
) -> Result<Vec<Book>> {
    client.get(&format!("/api/Author/{}/books", id))
}

/// Fill `book_count` from the full book list. The backend does not send a
/// count, so this is a display placeholder only.
pub fn with_book_counts(authors: Vec<Author>, books: &[Book]) -> Vec<Author> {
    let mut counts: HashMap<AuthorId, u32> = HashMap::new();
    for book in books {
        if let Some(id) = book.author_id {
            *counts.entry(id).or_default() += 1;
        }
    }
    authors
        .into_iter()
        .map(|mut a| {
            a.book_count = counts.get(&a.author_id).copied().unwrap_or(0);
            a
        })
        .collect()
}

/// Authors whose name contains `term`, ignoring case, sorted by name.
pub fn search_authors(authors: &[Author], term: &str) -> Vec<Author> {
    let needle = term.trim().to_lowercase();
    let mut found: Vec<Author> = authors
        .iter()
        .filter(|a| needle.is_empty() || a.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    found.sort_by_key(|a| a.name.to_lowercase());
    found
}
