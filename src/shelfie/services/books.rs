use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{AuthorId, Book, BookId, BookInput, GenreId};
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn get_books<T: Transport, S: SessionStore>(client: &ApiClient<T, S>) -> Result<Vec<Book>> {
    client.get("/api/Book")
}

pub fn get_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: BookId,
) -> Result<Book> {
    client.get(&format!("/api/Book/{}", id))
}

pub fn create_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    input: &BookInput,
) -> Result<Book> {
    client.post("/api/Book", input)
}

pub fn update_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: BookId,
    input: &BookInput,
) -> Result<()> {
    client.put_unit(&format!("/api/Book/{}", id), input)
}

pub fn delete_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: BookId,
) -> Result<()> {
    client.delete(&format!("/api/Book/{}", id))
}

/// Books whose title or ISBN-13 contains `term`, ignoring case.
/// A blank term matches everything.
pub fn search_books(books: &[Book], term: &str) -> Vec<Book> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return books.to_vec();
    }
    books
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle)
                || b
                    .isbn13
                    .as_deref()
                    .is_some_and(|isbn| isbn.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// The backend has no popularity signal yet, so "popular" is newest first,
/// same as [`recent_books`].
pub fn popular_books(books: &[Book], limit: usize) -> Vec<Book> {
    newest_first(books, limit)
}

pub fn recent_books(books: &[Book], limit: usize) -> Vec<Book> {
    newest_first(books, limit)
}

fn newest_first(books: &[Book], limit: usize) -> Vec<Book> {
    let mut sorted = books.to_vec();
    sorted.sort_by(|a, b| b.book_id.cmp(&a.book_id));
    sorted.truncate(limit);
    sorted
}

pub fn books_by_genre(books: &[Book], genre_id: GenreId) -> Vec<Book> {
    books
        .iter()
        .filter(|b| b.genre_id == Some(genre_id))
        .cloned()
        .collect()
}

pub fn books_by_author(books: &[Book], author_id: AuthorId) -> Vec<Book> {
    books
        .iter()
        .filter(|b| b.author_id == Some(author_id))
        .cloned()
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::client::fixtures::anonymous_client;
    use crate::transport::Method;
    use serde_json::json;

    #[test]
    fn search_matches_title_or_isbn_case_insensitively() {
        let found = search_books(&catalog(), "Foo");
        let ids: Vec<i64> = found.iter().map(|b| b.book_id).collect();
        assert_eq!(ids, vec![3, 8, 1]);
        for book in &catalog() {
            if !ids.contains(&book.book_id) {
                assert!(!book.title.to_lowercase().contains("foo"));
            }
        }
    }

    #[test]
    fn blank_search_keeps_everything() {
        assert_eq!(search_books(&catalog(), "  ").len(), catalog().len());
    }

    #[test]
    fn popular_and_recent_are_capped_and_newest_first() {
        for list in [popular_books(&catalog(), 5), recent_books(&catalog(), 5)] {
            assert!(list.len() <= 5);
            let ids: Vec<i64> = list.iter().map(|b| b.book_id).collect();
            assert_eq!(ids, vec![12, 8, 7, 5, 3]);
        }
        assert_eq!(recent_books(&catalog()[..2], 5).len(), 2);
        assert!(popular_books(&catalog(), 0).is_empty());
    }

    #[test]
    fn filters_by_genre_and_author() {
        let by_genre: Vec<i64> = books_by_genre(&catalog(), 10)
            .iter()
            .map(|b| b.book_id)
            .collect();
        assert_eq!(by_genre, vec![3, 5]);
        assert_eq!(books_by_author(&catalog(), 2).len(), 1);
    }

    #[test]
    fn get_book_hits_its_endpoint() {
        let client = anonymous_client();
        client.transport().on(
            Method::Get,
            "/api/Book/3",
            200,
            json!({ "BookId": 3, "Title": "Dune", "PageCount": 412 }),
        );
        let book = get_book(&client, 3).unwrap();
        assert_eq!(book.page_count, 412);
    }

    #[test]
    fn create_book_posts_pascal_case() {
        let client = anonymous_client();
        client.transport().on(
            Method::Post,
            "/api/Book",
            201,
            json!({ "BookId": 99, "Title": "New" }),
        );
        let input = BookInput {
            title: "New".into(),
            page_count: 10,
            ..Default::default()
        };
        let created = create_book(&client, &input).unwrap();
        assert_eq!(created.book_id, 99);
        let body = client.transport().last_request().unwrap().body.unwrap();
        assert_eq!(body, json!({ "Title": "New", "PageCount": 10 }));
    }
}
