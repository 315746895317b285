//! # Commands
//!
//! One module per area of the client. A command runs the reads and writes a
//! page or action needs (always through [`crate::query`]) and returns a
//! [`CmdResult`]: the records to show plus messages with a level. Commands
//! never print; rendering is the CLI's job.

use crate::derived::{AuthorDetail, BookDetail, GenreDetail, HomePageData, ProfileData};
use crate::model::{Author, Book, Comment, Genre, Review, Shelf, User, UserBook};
use crate::route::Route;

pub mod admin;
pub mod auth;
pub mod book;
pub mod browse;
pub mod library;
pub mod open;
pub mod overview;
pub mod reviews;
pub mod shelves;

#[derive(Debug, Clone, PartialEq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Aggregate pages, rendered as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Home(HomePageData),
    Profile(ProfileData),
    Book(Box<BookDetail>),
    Author(AuthorDetail),
    Genre(GenreDetail),
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub library: Vec<UserBook>,
    pub shelves: Vec<Shelf>,
    pub reviews: Vec<Review>,
    pub comments: Vec<Comment>,
    pub user: Option<User>,
    pub page: Option<PageView>,
    /// Where the client ended up, for commands that navigate.
    pub location: Option<Route>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    pub fn with_authors(mut self, authors: Vec<Author>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_library(mut self, entries: Vec<UserBook>) -> Self {
        self.library = entries;
        self
    }

    pub fn with_shelves(mut self, shelves: Vec<Shelf>) -> Self {
        self.shelves = shelves;
        self
    }

    pub fn with_reviews(mut self, reviews: Vec<Review>) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_page(mut self, page: PageView) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_location(mut self, route: Route) -> Self {
        self.location = Some(route);
        self
    }
}
