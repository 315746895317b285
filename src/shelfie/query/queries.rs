//! Cached reads. Each function pairs one service call with its key from
//! [`keys`]; the cache decides whether the network is touched at all.

use super::cache::QueryCache;
use super::keys;
use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    Author, AuthorId, Book, BookId, CanReview, Comment, Genre, GenreId, LibraryCheck, Review,
    ReviewId, Shelf, User, UserBook,
};
use crate::services::{auth, authors, books, genres, library, reviews};
use crate::session::SessionStore;
use crate::transport::Transport;

pub fn books<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<Vec<Book>> {
    cache.fetch(&keys::all_books(), || books::get_books(client))
}

pub fn book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
) -> Result<Book> {
    cache.fetch(&keys::book(id), || books::get_book(client, id))
}

/// Authors with their placeholder book counts filled from the book list.
pub fn authors<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<Vec<Author>> {
    let all_books = books(client, cache)?;
    let list = cache.fetch(&keys::all_authors(), || authors::get_authors(client))?;
    Ok(authors::with_book_counts(list, &all_books))
}

pub fn author<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: AuthorId,
) -> Result<Author> {
    cache.fetch(&keys::author(id), || authors::get_author(client, id))
}

pub fn author_books<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: AuthorId,
) -> Result<Vec<Book>> {
    cache.fetch(&keys::author_books(id), || authors::get_author_books(client, id))
}

pub fn genres<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<Vec<Genre>> {
    cache.fetch(&keys::all_genres(), || genres::get_genres(client))
}

pub fn genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
) -> Result<Genre> {
    cache.fetch(&keys::genre(id), || genres::get_genre(client, id))
}

pub fn book_reviews<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<Vec<Review>> {
    cache.fetch(&keys::review_list(book_id), || {
        reviews::get_book_reviews(client, book_id)
    })
}

pub fn can_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<CanReview> {
    cache.fetch(&keys::can_review(book_id), || reviews::can_review(client, book_id))
}

pub fn my_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<Option<Review>> {
    cache.fetch(&keys::my_review(book_id), || reviews::my_review(client, book_id))
}

pub fn comments<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
) -> Result<Vec<Comment>> {
    cache.fetch(&keys::comments(review_id), || {
        reviews::get_comments(client, review_id)
    })
}

pub fn library<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<Vec<UserBook>> {
    cache.fetch(&keys::library_entries(), || library::get_library(client))
}

pub fn library_check<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<LibraryCheck> {
    cache.fetch(&keys::library_check(book_id), || {
        library::check_book(client, book_id)
    })
}

pub fn shelves<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<Vec<Shelf>> {
    cache.fetch(&keys::shelves(), || library::get_shelves(client))
}

pub fn me<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<User> {
    cache.fetch(&keys::me(), || auth::me(client))
}
