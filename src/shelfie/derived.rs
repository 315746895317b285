//! # Page Aggregates
//!
//! Each page needs several reads at once. The functions here run those reads
//! through [`crate::query::queries`] and shape the answers into one value per
//! page. They hold no state of their own.
//!
//! Only the main read of a page is fatal. Secondary reads (reviews under a
//! book, the library preview on the home page) degrade to empty with a
//! warning so the page still renders.

use crate::client::ApiClient;
use crate::eligibility::{self, QueryState, ReviewEligibility};
use crate::error::Result;
use crate::model::{
    Author, AuthorId, Book, BookId, Genre, GenreId, LibraryCheck, ReadingStatus, Review, Shelf,
    User, UserBook,
};
use crate::progress;
use crate::query::{queries, QueryCache};
use crate::services::books;
use crate::session::{self, SessionStore};
use crate::transport::Transport;

pub const HOME_LIST_LIMIT: usize = 8;
pub const LIBRARY_PREVIEW_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct HomePageData {
    pub popular: Vec<Book>,
    pub recent: Vec<Book>,
    pub genres: Vec<Genre>,
    /// `None` when nobody is logged in.
    pub library_preview: Option<Vec<UserBook>>,
}

pub fn home_page<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<HomePageData> {
    let all_books = queries::books(client, cache)?;
    let genres = queries::genres(client, cache).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "genres unavailable");
        Vec::new()
    });

    let library_preview = if session::is_authenticated(client.session()) {
        match queries::library(client, cache) {
            Ok(entries) => Some(library_preview(entries)),
            Err(e) => {
                tracing::warn!(error = %e, "library preview unavailable");
                Some(Vec::new())
            }
        }
    } else {
        None
    };

    Ok(HomePageData {
        popular: books::popular_books(&all_books, HOME_LIST_LIMIT),
        recent: books::recent_books(&all_books, HOME_LIST_LIMIT),
        genres,
        library_preview,
    })
}

/// Books being read first, then the rest in library order.
fn library_preview(mut entries: Vec<UserBook>) -> Vec<UserBook> {
    entries.sort_by_key(|e| e.status_id != ReadingStatus::CurrentlyReading);
    entries.truncate(LIBRARY_PREVIEW_LIMIT);
    entries
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LibraryStats {
    pub total: usize,
    pub want_to_read: usize,
    pub currently_reading: usize,
    pub read: usize,
    /// Whole books for finished entries, the current page otherwise.
    pub pages_read: u64,
    /// Mean progress over books being read, 0 when there are none.
    pub average_progress: u8,
}

impl LibraryStats {
    pub fn from_entries(entries: &[UserBook]) -> Self {
        let mut stats = LibraryStats {
            total: entries.len(),
            ..Default::default()
        };
        let mut progress_sum = 0u32;

        for entry in entries {
            match entry.status_id {
                ReadingStatus::WantToRead => stats.want_to_read += 1,
                ReadingStatus::CurrentlyReading => {
                    stats.currently_reading += 1;
                    progress_sum += u32::from(progress::for_user_book(entry));
                }
                ReadingStatus::Read => stats.read += 1,
            }
            stats.pages_read += u64::from(pages_read(entry));
        }

        if stats.currently_reading > 0 {
            let mean = f64::from(progress_sum) / stats.currently_reading as f64;
            stats.average_progress = mean.round() as u8;
        }
        stats
    }
}

fn pages_read(entry: &UserBook) -> u32 {
    let page_count = entry.page_count();
    match entry.status_id {
        ReadingStatus::Read => page_count,
        ReadingStatus::CurrentlyReading if page_count > 0 => entry.current_page.min(page_count),
        ReadingStatus::CurrentlyReading => entry.current_page,
        ReadingStatus::WantToRead => 0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub user: User,
    pub stats: LibraryStats,
    pub shelves: Vec<Shelf>,
}

pub fn profile<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
) -> Result<ProfileData> {
    let user = queries::me(client, cache)?;
    let entries = queries::library(client, cache)?;
    let shelves = queries::shelves(client, cache)?;
    Ok(ProfileData {
        user,
        stats: LibraryStats::from_entries(&entries),
        shelves,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

pub fn author_detail<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: AuthorId,
) -> Result<AuthorDetail> {
    let mut author = queries::author(client, cache, id)?;
    let books = queries::author_books(client, cache, id)?;
    author.book_count = books.len() as u32;
    Ok(AuthorDetail { author, books })
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

pub fn genre_detail<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: GenreId,
) -> Result<GenreDetail> {
    let genre = queries::genre(client, cache, id)?;
    let all_books = queries::books(client, cache)?;
    Ok(GenreDetail {
        genre,
        books: books::books_by_genre(&all_books, id),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub reviews: Vec<Review>,
    /// Library record for this book; `None` when logged out or unknown.
    pub membership: Option<LibraryCheck>,
    /// What the review area offers; `None` when logged out.
    pub eligibility: Option<ReviewEligibility>,
}

pub fn book_detail<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    cache: &mut QueryCache,
    id: BookId,
) -> Result<BookDetail> {
    let book = queries::book(client, cache, id)?;
    let reviews = queries::book_reviews(client, cache, id).unwrap_or_else(|e| {
        tracing::warn!(book_id = id, error = %e, "reviews unavailable");
        Vec::new()
    });

    if !session::is_authenticated(client.session()) {
        return Ok(BookDetail {
            book,
            reviews,
            membership: None,
            eligibility: None,
        });
    }

    let can_review = QueryState::from(queries::can_review(client, cache, id));
    let membership = QueryState::from(queries::library_check(client, cache, id));
    let my_review = QueryState::from(queries::my_review(client, cache, id));
    let eligibility = eligibility::decide(&can_review, &membership, &my_review);

    Ok(BookDetail {
        book,
        reviews,
        membership: membership.ready().cloned(),
        eligibility: Some(eligibility),
    })
}
