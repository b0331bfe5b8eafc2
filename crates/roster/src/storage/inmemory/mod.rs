//! In-memory storage backend.
//!
//! Stores students in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. Used by the
//! `inmemory` feature and by router tests that need no database.

mod repository;

pub use repository::InMemoryRepository;
