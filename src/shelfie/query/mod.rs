//! # Query Layer
//!
//! Sits between pages and [`crate::services`]:
//!
//! - [`cache`]: keyed JSON cache with a staleness window, retry policy and
//!   on-disk persistence between runs.
//! - [`keys`]: every cache key, defined once.
//! - [`queries`]: cached reads, one per service read.
//! - [`mutations`]: every write, each followed by invalidation of the keys
//!   it makes stale (and, for reading status, an optimistic patch).
//!
//! Pages never call services directly. Reads go through `queries`, writes
//! through `mutations`; that way a given write invalidates the same keys
//! whichever page triggered it.

pub mod cache;
pub mod keys;
pub mod mutations;
pub mod queries;

pub use cache::{CacheEntry, QueryCache, QueryKey, QueryPolicy};
