//! # Resource Services
//!
//! One module per backend resource. Every function here maps to exactly one
//! REST endpoint, or is a pure computation over a full-collection response
//! (the backend has no server-side search or pagination, so filtering and
//! sorting happen on the client).
//!
//! Services know nothing about caching; that belongs to [`crate::query`].
//!
//! - [`books`]: `/api/Book`, plus search/popular/recent over the full list
//! - [`authors`]: `/api/Author`
//! - [`genres`]: `/api/genre`
//! - [`reviews`]: `/api/Review` and review comments
//! - [`library`]: `/api/UserBook` (membership) and `/api/Bookshelf` (shelves)
//! - [`auth`]: `/api/Auth`

pub mod auth;
pub mod authors;
pub mod books;
pub mod genres;
pub mod library;
pub mod reviews;
