//! # Routes
//!
//! Every page of the client has a path, and the path is the stable way to
//! refer to it: `shelfie open /books/12` renders the same page a link to
//! `/books/12` would. [`Route`] is the parsed form, [`Location`] is where the
//! client currently "is".
//!
//! The location matters for one side effect: a 401 from any call sends the
//! client to `/login`, unless it is already there.

use crate::model::{AuthorId, BookId, GenreId, ShelfId};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Books,
    BookDetail(BookId),
    Authors,
    AuthorDetail(AuthorId),
    Genres,
    GenreDetail(GenreId),
    Library,
    Shelf(ShelfId),
    Profile,
    Admin,
    NotFound(String),
}

impl Route {
    /// Pages that only make sense with a session.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Library | Route::Shelf(_) | Route::Profile | Route::Admin
        )
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    /// Never fails: unknown paths become [`Route::NotFound`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["books"] => Route::Books,
            ["books", id] => id.parse().map(Route::BookDetail).unwrap_or_else(|_| not_found(s)),
            ["authors"] => Route::Authors,
            ["authors", id] => id
                .parse()
                .map(Route::AuthorDetail)
                .unwrap_or_else(|_| not_found(s)),
            ["genres"] => Route::Genres,
            ["genres", id] => id
                .parse()
                .map(Route::GenreDetail)
                .unwrap_or_else(|_| not_found(s)),
            ["library"] => Route::Library,
            ["library", "shelves", id] => {
                id.parse().map(Route::Shelf).unwrap_or_else(|_| not_found(s))
            }
            ["profile"] => Route::Profile,
            ["admin"] => Route::Admin,
            _ => not_found(s),
        };
        Ok(route)
    }
}

fn not_found(raw: &str) -> Route {
    Route::NotFound(raw.to_string())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::Books => write!(f, "/books"),
            Route::BookDetail(id) => write!(f, "/books/{}", id),
            Route::Authors => write!(f, "/authors"),
            Route::AuthorDetail(id) => write!(f, "/authors/{}", id),
            Route::Genres => write!(f, "/genres"),
            Route::GenreDetail(id) => write!(f, "/genres/{}", id),
            Route::Library => write!(f, "/library"),
            Route::Shelf(id) => write!(f, "/library/shelves/{}", id),
            Route::Profile => write!(f, "/profile"),
            Route::Admin => write!(f, "/admin"),
            Route::NotFound(raw) => write!(f, "{}", raw),
        }
    }
}

/// The client's current route.
#[derive(Debug)]
pub struct Location {
    current: RefCell<Route>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Location {
    pub fn new(route: Route) -> Self {
        Self {
            current: RefCell::new(route),
        }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn is_at(&self, route: &Route) -> bool {
        *self.current.borrow() == *route
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(to = %route, "navigate");
        *self.current.borrow_mut() = route;
    }
}
