//! Cached repository decorator.
//!
//! `CachedStudentRepository` wraps any `StudentRepository` with any `Cache`:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then write through (or invalidate) the cache
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(SqliteRepository::new("roster.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedStudentRepository::new(repo, cache, Duration::from_secs(60));
//! ```

mod student;

pub use student::CachedStudentRepository;
