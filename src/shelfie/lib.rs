//! # Shelfie Architecture
//!
//! Shelfie is a **book-tracking client library** for a REST backend that
//! owns every book, shelf, review and reading record. The library browses
//! the catalog, keeps a personal library with shelves and reading progress,
//! and writes reviews and comments. A CLI ships with it, but nothing below
//! the CLI knows about terminals.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Facade owning the client and the query cache             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, derived.rs)                  │
//! │  - One function per page or action, returns CmdResult       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query Layer (query/)                                       │
//! │  - Cached reads, centralized writes and invalidation        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Services + Client (services/, client.rs, transport/)       │
//! │  - One function per endpoint; auth and 401 handling         │
//! │  - HttpTransport (production), MemTransport (testing)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Backend Is the Source of Truth
//!
//! Every record in [`model`] is a cache entry. The client re-derives a few
//! things the backend reports inconsistently, each in exactly one place:
//!
//! - reading progress: [`progress::reading_progress`]
//! - whether the reader may review a book: [`eligibility::decide`]
//! - which cached reads a write makes stale: [`query::mutations`]
//!
//! ## Testing Strategy
//!
//! Every layer above the transport is tested against `MemTransport` and
//! `MemSessionStore`: scripted replies in, recorded requests out. A test
//! asserts on what was sent (or that nothing was) as much as on what came
//! back. The binary is tested end to end in `tests/` for behavior that needs
//! no backend.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: Per-page and per-action logic
//! - [`derived`]: Page aggregates (home, profile, book, author, genre)
//! - [`query`]: Query cache, keys, cached reads and mutations
//! - [`services`]: One module per backend resource
//! - [`client`]: Request/response interceptors over a transport
//! - [`transport`]: HTTP and in-memory transports
//! - [`session`]: Persisted token and user
//! - [`route`]: Paths, route guards and the current location
//! - [`model`]: Records and write payloads
//! - [`eligibility`], [`progress`], [`validation`]: Client-side rules
//! - [`config`]: Configuration and directories
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod derived;
pub mod eligibility;
pub mod error;
pub mod model;
pub mod progress;
pub mod query;
pub mod route;
pub mod services;
pub mod session;
pub mod transport;
pub mod validation;
