//! Every write the client performs.
//!
//! A write changes what some cached reads would return, so each function
//! here invalidates a fixed set of keys after the backend accepts it. The
//! sets are defined once (`library_keys`, `review_keys`, ...) and shared by
//! every caller: the library page, the book page and the review prompts all
//! go through the same functions.
//!
//! Form checks from [`crate::validation`] run first; a rejected form never
//! reaches the transport.

use super::cache::{QueryCache, QueryKey};
use super::keys;
use crate::client::ApiClient;
use crate::error::Result;
use crate::model::{
    AddToLibraryInput, AuthResponse, Book, BookId, BookInput, Comment, CommentId, CommentInput,
    Genre, GenreId, GenreInput, LibraryCheck, LoginInput, MoveInput, ProgressInput,
    ReadingStatus, RegisterInput, Review, ReviewId, ReviewInput, Shelf, ShelfId, ShelfInput,
    StatusInput, User, UserBook,
};
use crate::services::{auth, books, genres, library, reviews};
use crate::session::{self, SessionStore};
use crate::transport::Transport;
use crate::validation;

/// Keys a library membership write for `book_id` makes stale: the library
/// itself (entries and membership checks), shelf counts, and everything
/// about reviewing that book, since eligibility follows the reading status.
pub fn library_keys(book_id: BookId) -> Vec<QueryKey> {
    vec![keys::library(), keys::shelves(), keys::book_reviews(book_id)]
}

/// Keys a review write for `book_id` makes stale. Book records carry the
/// average rating and review count.
pub fn review_keys(book_id: BookId) -> Vec<QueryKey> {
    vec![keys::book_reviews(book_id), keys::books()]
}

/// Keys a comment write on `review_id` makes stale. Review lists carry the
/// comment count, and the book is not known here, so every list goes.
pub fn comment_keys(review_id: ReviewId) -> Vec<QueryKey> {
    vec![keys::comments(review_id), QueryKey::new(["reviews"])]
}

fn shelf_keys() -> Vec<QueryKey> {
    vec![keys::shelves(), keys::library()]
}

fn catalog_keys() -> Vec<QueryKey> {
    vec![keys::books(), keys::authors(), keys::genres()]
}

fn invalidate_all(cache: &mut QueryCache, prefixes: &[QueryKey]) {
    for prefix in prefixes {
        cache.invalidate(prefix);
    }
}

// --- Library membership ---

pub fn add_to_library<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &AddToLibraryInput,
) -> Result<()> {
    library::add_book(client, input)?;
    tracing::info!(book_id = input.book_id, status = input.status_id.id(), "added to library");
    invalidate_all(cache, &library_keys(input.book_id));
    Ok(())
}

pub fn remove_from_library<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<()> {
    library::remove_book(client, book_id)?;
    tracing::info!(book_id, "removed from library");
    invalidate_all(cache, &library_keys(book_id));
    Ok(())
}

/// Change the reading status.
///
/// The cached library list and membership check are patched before the
/// request goes out, so a page rendered meanwhile already shows the new
/// status. A failed request puts both entries back as they were.
pub fn update_status<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    status: ReadingStatus,
) -> Result<()> {
    let entries_key = keys::library_entries();
    let check_key = keys::library_check(book_id);
    let entries_before = cache.snapshot(&entries_key);
    let check_before = cache.snapshot(&check_key);

    cache.update(&entries_key, |entries: &mut Vec<UserBook>| {
        for entry in entries.iter_mut().filter(|e| e.book_id == book_id) {
            entry.status_id = status;
        }
    })?;
    cache.update(&check_key, |check: &mut LibraryCheck| {
        if check.exists {
            check.status_id = Some(status);
            if let Some(user_book) = check.user_book.as_mut() {
                user_book.status_id = status;
            }
        }
    })?;

    match library::update_status(client, book_id, &StatusInput { status_id: status }) {
        Ok(()) => {
            tracing::info!(book_id, status = status.id(), "status updated");
            invalidate_all(cache, &library_keys(book_id));
            Ok(())
        }
        Err(e) => {
            tracing::debug!(book_id, "rolling back optimistic status");
            cache.restore(&entries_key, entries_before);
            cache.restore(&check_key, check_before);
            Err(e)
        }
    }
}

/// The "mark as read" prompt of the review area.
pub fn mark_as_read<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
) -> Result<()> {
    update_status(client, cache, book_id, ReadingStatus::Read)
}

/// Record the current page. `page_count` is the book's length; 0 means
/// unknown and skips the upper bound.
pub fn update_progress<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    current_page: i64,
    page_count: u32,
    notes: Option<String>,
) -> Result<()> {
    let current_page = validation::progress(current_page, page_count)?;
    library::update_progress(
        client,
        book_id,
        &ProgressInput {
            current_page,
            notes,
        },
    )?;
    tracing::info!(book_id, current_page, "progress updated");
    invalidate_all(cache, &library_keys(book_id));
    Ok(())
}

/// Move a book to a shelf, or off every shelf with `None`.
pub fn move_to_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    book_id: BookId,
    shelf_id: Option<ShelfId>,
) -> Result<()> {
    library::move_book(client, book_id, &MoveInput { shelf_id })?;
    invalidate_all(cache, &library_keys(book_id));
    Ok(())
}

// --- Shelves ---

pub fn create_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &ShelfInput,
) -> Result<Shelf> {
    validation::shelf(input)?;
    let shelf = library::create_shelf(client, &trimmed_shelf(input))?;
    tracing::info!(shelf_id = shelf.shelf_id, "shelf created");
    invalidate_all(cache, &shelf_keys());
    Ok(shelf)
}

pub fn update_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ShelfId,
    input: &ShelfInput,
) -> Result<()> {
    validation::shelf(input)?;
    library::update_shelf(client, id, &trimmed_shelf(input))?;
    invalidate_all(cache, &shelf_keys());
    Ok(())
}

pub fn delete_shelf<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ShelfId,
) -> Result<()> {
    library::delete_shelf(client, id)?;
    tracing::info!(shelf_id = id, "shelf deleted");
    invalidate_all(cache, &shelf_keys());
    Ok(())
}

fn trimmed_shelf(input: &ShelfInput) -> ShelfInput {
    ShelfInput {
        name: input.name.trim().to_string(),
        description: input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from),
    }
}

// --- Reviews and comments ---

pub fn create_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &ReviewInput,
) -> Result<Review> {
    validation::review(input)?;
    let review = reviews::create_review(client, input)?;
    invalidate_all(cache, &review_keys(input.book_id));
    Ok(review)
}

pub fn update_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ReviewId,
    input: &ReviewInput,
) -> Result<()> {
    validation::review(input)?;
    reviews::update_review(client, id, input)?;
    invalidate_all(cache, &review_keys(input.book_id));
    Ok(())
}

pub fn delete_review<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: ReviewId,
    book_id: BookId,
) -> Result<()> {
    reviews::delete_review(client, id)?;
    invalidate_all(cache, &review_keys(book_id));
    cache.remove(&keys::comments(id));
    Ok(())
}

pub fn add_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
    input: &CommentInput,
) -> Result<Comment> {
    validation::comment(input)?;
    let comment = reviews::add_comment(client, review_id, input)?;
    invalidate_all(cache, &comment_keys(review_id));
    Ok(comment)
}

pub fn update_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
    comment_id: CommentId,
    input: &CommentInput,
) -> Result<()> {
    validation::comment(input)?;
    reviews::update_comment(client, review_id, comment_id, input)?;
    invalidate_all(cache, &comment_keys(review_id));
    Ok(())
}

pub fn delete_comment<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    review_id: ReviewId,
    comment_id: CommentId,
) -> Result<()> {
    reviews::delete_comment(client, review_id, comment_id)?;
    invalidate_all(cache, &comment_keys(review_id));
    Ok(())
}

// --- Catalog administration ---

pub fn create_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &BookInput,
) -> Result<Book> {
    validation::book(input)?;
    let book = books::create_book(client, input)?;
    invalidate_all(cache, &catalog_keys());
    Ok(book)
}

pub fn update_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
    input: &BookInput,
) -> Result<()> {
    validation::book(input)?;
    books::update_book(client, id, input)?;
    invalidate_all(cache, &catalog_keys());
    Ok(())
}

pub fn delete_book<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
) -> Result<()> {
    books::delete_book(client, id)?;
    invalidate_all(cache, &catalog_keys());
    invalidate_all(cache, &library_keys(id));
    Ok(())
}

pub fn create_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &GenreInput,
) -> Result<Genre> {
    validation::genre(input)?;
    let genre = genres::create_genre(client, input)?;
    invalidate_all(cache, &catalog_keys());
    Ok(genre)
}

pub fn update_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
    input: &GenreInput,
) -> Result<()> {
    validation::genre(input)?;
    genres::update_genre(client, id, input)?;
    invalidate_all(cache, &catalog_keys());
    Ok(())
}

pub fn delete_genre<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
) -> Result<()> {
    genres::delete_genre(client, id)?;
    invalidate_all(cache, &catalog_keys());
    Ok(())
}

// --- Session ---

/// Log in, persist the session and drop everything cached for whoever was
/// logged in before.
pub fn login<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &LoginInput,
) -> Result<User> {
    let response = auth::login(client, input)?;
    start_session(client, cache, response)
}

pub fn register<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    input: &RegisterInput,
) -> Result<User> {
    let response = auth::register(client, input)?;
    start_session(client, cache, response)
}

fn start_session<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    response: AuthResponse,
) -> Result<User> {
    session::store_login(client.session(), &response)?;
    cache.clear();
    tracing::info!(user = %response.user.user_name, "logged in");
    Ok(response.user)
}

pub fn logout<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<()> {
    session::clear(client.session())?;
    cache.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{anonymous_client, logged_in_client};
    use crate::error::ShelfieError;
    use crate::query::cache::QueryPolicy;
    use crate::query::queries;
    use crate::transport::Method;
    use serde_json::json;
    use std::time::Duration;

    fn cache() -> QueryCache {
        QueryCache::new(QueryPolicy {
            retry_delay: Duration::ZERO,
            ..Default::default()
        })
    }

    fn library_json(status: u8) -> serde_json::Value {
        json!([{ "BookId": 4, "StatusId": status, "Book": { "BookId": 4, "Title": "Tắt đèn", "PageCount": 180 } }])
    }

    #[test]
    fn every_library_write_invalidates_the_same_keys() {
        let client = logged_in_client();
        let t = client.transport();
        t.on_text(Method::Post, "/api/UserBook", 201, "");
        t.on_text(Method::Put, "/api/UserBook/4/status", 204, "");
        t.on_text(Method::Put, "/api/UserBook/4/progress", 204, "");
        t.on_text(Method::Put, "/api/UserBook/4/shelf", 204, "");
        t.on_text(Method::Delete, "/api/UserBook/4", 204, "");

        let writes: Vec<Box<dyn Fn(&mut QueryCache) -> Result<()> + '_>> = vec![
            Box::new(|c: &mut QueryCache| {
                add_to_library(
                    &client,
                    c,
                    &AddToLibraryInput {
                        book_id: 4,
                        status_id: ReadingStatus::WantToRead,
                        shelf_id: None,
                    },
                )
            }),
            Box::new(|c: &mut QueryCache| mark_as_read(&client, c, 4)),
            Box::new(|c: &mut QueryCache| update_progress(&client, c, 4, 10, 180, None)),
            Box::new(|c: &mut QueryCache| move_to_shelf(&client, c, 4, Some(2))),
            Box::new(|c: &mut QueryCache| remove_from_library(&client, c, 4)),
        ];

        for write in writes {
            let mut cache = cache();
            for key in [
                keys::library_entries(),
                keys::library_check(4),
                keys::shelves(),
                keys::can_review(4),
                keys::my_review(4),
                keys::book(4),
            ] {
                cache.set(&key, &json!(null)).unwrap();
            }

            write(&mut cache).unwrap();

            assert!(cache.is_stale(&keys::library_entries()));
            assert!(cache.is_stale(&keys::library_check(4)));
            assert!(cache.is_stale(&keys::shelves()));
            assert!(cache.is_stale(&keys::can_review(4)));
            assert!(cache.is_stale(&keys::my_review(4)));
            assert!(!cache.is_stale(&keys::book(4)));
        }
    }

    #[test]
    fn status_is_patched_into_cached_reads() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(Method::Get, "/api/UserBook", 200, library_json(1));
        t.on(
            Method::Get,
            "/api/UserBook/check/4",
            200,
            json!({ "Exists": true, "StatusId": 1 }),
        );
        t.on_text(Method::Put, "/api/UserBook/4/status", 204, "");
        let mut cache = cache();
        queries::library(&client, &mut cache).unwrap();
        queries::library_check(&client, &mut cache, 4).unwrap();

        update_status(&client, &mut cache, 4, ReadingStatus::CurrentlyReading).unwrap();

        let entries: Vec<UserBook> = cache.get(&keys::library_entries()).unwrap();
        assert_eq!(entries[0].status_id, ReadingStatus::CurrentlyReading);
        let check: LibraryCheck = cache.get(&keys::library_check(4)).unwrap();
        assert_eq!(check.status_id, Some(ReadingStatus::CurrentlyReading));
        assert!(cache.is_stale(&keys::library_entries()));
    }

    #[test]
    fn failed_status_update_rolls_back() {
        let client = logged_in_client();
        let t = client.transport();
        t.on(Method::Get, "/api/UserBook", 200, library_json(1));
        t.on_text(Method::Put, "/api/UserBook/4/status", 500, "boom");
        let mut cache = cache();
        queries::library(&client, &mut cache).unwrap();

        let err = update_status(&client, &mut cache, 4, ReadingStatus::Read).unwrap_err();
        assert!(matches!(err, ShelfieError::Server { status: 500, .. }));

        let entries: Vec<UserBook> = cache.get(&keys::library_entries()).unwrap();
        assert_eq!(entries[0].status_id, ReadingStatus::WantToRead);
        assert!(!cache.is_stale(&keys::library_entries()));
        assert!(!cache.contains(&keys::library_check(4)));
    }

    #[test]
    fn empty_shelf_name_makes_no_request() {
        let client = logged_in_client();
        let err = create_shelf(
            &client,
            &mut cache(),
            &ShelfInput {
                name: "   ".into(),
                description: None,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Tên kệ sách không được để trống"));
        assert_eq!(client.transport().total(), 0);
    }

    #[test]
    fn shelf_names_are_trimmed_before_sending() {
        let client = logged_in_client();
        client.transport().on(
            Method::Post,
            "/api/Bookshelf",
            201,
            json!({ "ShelfId": 3, "Name": "Kinh điển" }),
        );
        create_shelf(
            &client,
            &mut cache(),
            &ShelfInput {
                name: "  Kinh điển ".into(),
                description: Some(" ".into()),
            },
        )
        .unwrap();
        let body = client.transport().last_request().unwrap().body.unwrap();
        assert_eq!(body, json!({ "Name": "Kinh điển" }));
    }

    #[test]
    fn progress_past_the_last_page_makes_no_request() {
        let client = logged_in_client();
        let err = update_progress(&client, &mut cache(), 4, 181, 180, None).unwrap_err();
        assert!(err
            .to_string()
            .contains("Số trang hiện tại không được vượt quá 180 trang"));
        assert_eq!(client.transport().writes(), 0);
    }

    #[test]
    fn review_write_invalidates_the_book() {
        let client = logged_in_client();
        client.transport().on(
            Method::Post,
            "/api/Review",
            201,
            json!({ "ReviewId": 1, "BookId": 4, "Rating": 4, "Content": "Hay" }),
        );
        let mut cache = cache();
        cache.set(&keys::book(4), &json!(null)).unwrap();
        cache.set(&keys::my_review(4), &json!(null)).unwrap();
        cache.set(&keys::library_entries(), &json!([])).unwrap();

        create_review(
            &client,
            &mut cache,
            &ReviewInput {
                book_id: 4,
                rating: 4,
                content: "Hay".into(),
                is_public: true,
            },
        )
        .unwrap();

        assert!(cache.is_stale(&keys::book(4)));
        assert!(cache.is_stale(&keys::my_review(4)));
        assert!(!cache.is_stale(&keys::library_entries()));
    }

    #[test]
    fn login_stores_session_and_clears_cache() {
        let client = anonymous_client();
        client.transport().on(
            Method::Post,
            "/api/Auth/login",
            200,
            json!({ "Token": "abc", "User": { "UserId": 1, "UserName": "lan", "RoleId": 1 } }),
        );
        let mut cache = cache();
        cache.set(&keys::library_entries(), &json!([])).unwrap();

        let user = login(
            &client,
            &mut cache,
            &LoginInput {
                user_name: "lan".into(),
                password: "pw".into(),
            },
        )
        .unwrap();

        assert!(user.is_admin());
        assert_eq!(session::token(client.session()).as_deref(), Some("abc"));
        assert!(cache.is_empty());

        logout(&client, &mut cache).unwrap();
        assert!(!session::is_authenticated(client.session()));
    }
}
