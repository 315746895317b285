//! # API Facade
//!
//! The single entry point for every shelfie operation, whatever the UI.
//!
//! The facade:
//! - **Owns** the [`ApiClient`] and the [`QueryCache`] for the process
//! - **Dispatches** to the matching function in `commands/*.rs`
//! - **Normalizes inputs** (reading statuses, shelf names) before dispatch
//! - **Returns structured types** (`Result<CmdResult>`), never strings
//!
//! It holds no logic of its own. Commands decide what to fetch and write;
//! the facade only wires them to the client and cache.
//!
//! `ShelfieApi<T, S>` is generic over the transport and the session store:
//! production uses `HttpTransport` with `FileSessionStore`, tests use
//! `MemTransport` with `MemSessionStore`.

use crate::client::ApiClient;
use crate::commands::admin::BookPatch;
use crate::commands::browse::BookFilter;
use crate::commands::library::LibraryFilter;
use crate::commands::{self, CmdResult};
use crate::error::{Result, ShelfieError};
use crate::model::{
    AuthorId, BookId, BookInput, CommentId, GenreId, GenreInput, ReadingStatus, ReviewId, ShelfId,
};
use crate::query::{QueryCache, QueryPolicy};
use crate::route::Route;
use crate::session::SessionStore;
use crate::transport::Transport;
use std::path::Path;

pub struct ShelfieApi<T: Transport, S: SessionStore> {
    client: ApiClient<T, S>,
    cache: QueryCache,
}

impl<T: Transport, S: SessionStore> ShelfieApi<T, S> {
    pub fn new(transport: T, session: S, policy: QueryPolicy) -> Self {
        Self::with_cache(transport, session, QueryCache::new(policy))
    }

    /// Start from a cache loaded from disk.
    pub fn with_cache(transport: T, session: S, cache: QueryCache) -> Self {
        Self {
            client: ApiClient::new(transport, session),
            cache,
        }
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn location(&self) -> Route {
        self.client.location().current()
    }

    pub fn save_cache<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.cache.save(path)
    }

    // --- Session ---

    pub fn login(&mut self, user_name: &str, password: &str) -> Result<CmdResult> {
        commands::auth::login(&self.client, &mut self.cache, user_name, password)
    }

    pub fn register(&mut self, user_name: &str, email: &str, password: &str) -> Result<CmdResult> {
        commands::auth::register(&self.client, &mut self.cache, user_name, email, password)
    }

    pub fn logout(&mut self) -> Result<CmdResult> {
        commands::auth::logout(&self.client, &mut self.cache)
    }

    pub fn whoami(&mut self) -> Result<CmdResult> {
        commands::auth::whoami(&self.client, &mut self.cache)
    }

    // --- Pages ---

    pub fn open(&mut self, path: &str) -> Result<CmdResult> {
        commands::open::run(&self.client, &mut self.cache, path)
    }

    pub fn home(&mut self) -> Result<CmdResult> {
        commands::overview::home(&self.client, &mut self.cache)
    }

    pub fn profile(&mut self) -> Result<CmdResult> {
        commands::overview::profile(&self.client, &mut self.cache)
    }

    // --- Catalog ---

    pub fn books(&mut self, filter: &BookFilter) -> Result<CmdResult> {
        commands::browse::books(&self.client, &mut self.cache, filter)
    }

    pub fn book(&mut self, id: BookId) -> Result<CmdResult> {
        commands::book::show(&self.client, &mut self.cache, id)
    }

    pub fn resolve_review_prompt(&mut self, id: BookId) -> Result<CmdResult> {
        commands::book::resolve_prompt(&self.client, &mut self.cache, id)
    }

    pub fn authors(&mut self, search: Option<&str>) -> Result<CmdResult> {
        commands::browse::authors(&self.client, &mut self.cache, search)
    }

    pub fn author(&mut self, id: AuthorId) -> Result<CmdResult> {
        commands::browse::author(&self.client, &mut self.cache, id)
    }

    pub fn genres(&mut self) -> Result<CmdResult> {
        commands::browse::genres(&self.client, &mut self.cache)
    }

    pub fn genre(&mut self, id: GenreId) -> Result<CmdResult> {
        commands::browse::genre(&self.client, &mut self.cache, id)
    }

    // --- Library ---

    pub fn library(&mut self, status: Option<&str>, shelf_id: Option<ShelfId>) -> Result<CmdResult> {
        let status = status.map(parse_status).transpose()?;
        commands::library::list(
            &self.client,
            &mut self.cache,
            LibraryFilter { status, shelf_id },
        )
    }

    pub fn add_to_library(
        &mut self,
        book_id: BookId,
        status: &str,
        shelf_id: Option<ShelfId>,
    ) -> Result<CmdResult> {
        let status = parse_status(status)?;
        commands::library::add(&self.client, &mut self.cache, book_id, status, shelf_id)
    }

    pub fn remove_from_library(&mut self, book_id: BookId) -> Result<CmdResult> {
        commands::library::remove(&self.client, &mut self.cache, book_id)
    }

    pub fn set_status(&mut self, book_id: BookId, status: &str) -> Result<CmdResult> {
        let status = parse_status(status)?;
        commands::library::set_status(&self.client, &mut self.cache, book_id, status)
    }

    pub fn set_progress(
        &mut self,
        book_id: BookId,
        current_page: i64,
        notes: Option<String>,
    ) -> Result<CmdResult> {
        commands::library::set_progress(&self.client, &mut self.cache, book_id, current_page, notes)
    }

    pub fn move_to_shelf(&mut self, book_id: BookId, shelf_id: Option<ShelfId>) -> Result<CmdResult> {
        commands::library::move_to(&self.client, &mut self.cache, book_id, shelf_id)
    }

    // --- Shelves ---

    pub fn shelves(&mut self) -> Result<CmdResult> {
        commands::shelves::list(&self.client, &mut self.cache)
    }

    pub fn shelf(&mut self, id: ShelfId) -> Result<CmdResult> {
        commands::shelves::show(&self.client, &mut self.cache, id)
    }

    pub fn create_shelf(&mut self, name: &str, description: Option<String>) -> Result<CmdResult> {
        commands::shelves::create(&self.client, &mut self.cache, name, description)
    }

    pub fn update_shelf(
        &mut self,
        id: ShelfId,
        name: &str,
        description: Option<String>,
    ) -> Result<CmdResult> {
        commands::shelves::update(&self.client, &mut self.cache, id, name, description)
    }

    pub fn delete_shelf(&mut self, id: ShelfId) -> Result<CmdResult> {
        commands::shelves::delete(&self.client, &mut self.cache, id)
    }

    // --- Reviews ---

    pub fn reviews(&mut self, book_id: BookId) -> Result<CmdResult> {
        commands::reviews::list(&self.client, &mut self.cache, book_id)
    }

    pub fn write_review(
        &mut self,
        book_id: BookId,
        rating: u8,
        content: &str,
        is_public: bool,
    ) -> Result<CmdResult> {
        commands::reviews::write(&self.client, &mut self.cache, book_id, rating, content, is_public)
    }

    pub fn edit_review(
        &mut self,
        book_id: BookId,
        rating: Option<u8>,
        content: Option<&str>,
        is_public: Option<bool>,
    ) -> Result<CmdResult> {
        commands::reviews::edit(&self.client, &mut self.cache, book_id, rating, content, is_public)
    }

    pub fn delete_review(&mut self, book_id: BookId) -> Result<CmdResult> {
        commands::reviews::delete(&self.client, &mut self.cache, book_id)
    }

    pub fn comments(&mut self, review_id: ReviewId) -> Result<CmdResult> {
        commands::reviews::comments(&self.client, &mut self.cache, review_id)
    }

    pub fn comment(&mut self, review_id: ReviewId, content: &str) -> Result<CmdResult> {
        commands::reviews::comment(&self.client, &mut self.cache, review_id, content)
    }

    pub fn edit_comment(
        &mut self,
        review_id: ReviewId,
        comment_id: CommentId,
        content: &str,
    ) -> Result<CmdResult> {
        commands::reviews::edit_comment(&self.client, &mut self.cache, review_id, comment_id, content)
    }

    pub fn delete_comment(&mut self, review_id: ReviewId, comment_id: CommentId) -> Result<CmdResult> {
        commands::reviews::delete_comment(&self.client, &mut self.cache, review_id, comment_id)
    }

    // --- Administration ---

    pub fn admin_dashboard(&mut self) -> Result<CmdResult> {
        commands::admin::dashboard(&self.client, &mut self.cache)
    }

    pub fn create_book(&mut self, input: &BookInput) -> Result<CmdResult> {
        commands::admin::create_book(&self.client, &mut self.cache, input)
    }

    pub fn update_book(&mut self, id: BookId, patch: BookPatch) -> Result<CmdResult> {
        commands::admin::update_book(&self.client, &mut self.cache, id, patch)
    }

    pub fn delete_book(&mut self, id: BookId) -> Result<CmdResult> {
        commands::admin::delete_book(&self.client, &mut self.cache, id)
    }

    pub fn create_genre(&mut self, input: &GenreInput) -> Result<CmdResult> {
        commands::admin::create_genre(&self.client, &mut self.cache, input)
    }

    pub fn update_genre(&mut self, id: GenreId, input: &GenreInput) -> Result<CmdResult> {
        commands::admin::update_genre(&self.client, &mut self.cache, id, input)
    }

    pub fn delete_genre(&mut self, id: GenreId) -> Result<CmdResult> {
        commands::admin::delete_genre(&self.client, &mut self.cache, id)
    }
}

fn parse_status(raw: &str) -> Result<ReadingStatus> {
    ReadingStatus::parse(raw).ok_or_else(|| {
        ShelfieError::Api(format!(
            "Unknown reading status '{}' (use want, reading or read)",
            raw
        ))
    })
}
