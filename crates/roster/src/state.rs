//! Application state shared by every request handler.
//!
//! The storage and cache backends are selected at compile time via feature
//! flags (see `storage` and `cache`). `AppState::new` opens whichever pair is
//! enabled, wraps the repository in the cache-aside decorator when caching is
//! on, and builds the mediator on top.

use std::sync::Arc;

use roster_core::cache::Cache;
use roster_core::dispatch::Mediator;
use roster_core::storage::StudentRepository;

use crate::config::{BasicAuthCredentials, Config};
use crate::storage::CachedStudentRepository;
use crate::students::build_mediator;

/// Shared application state.
///
/// Cheap to clone: the mediator sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Routes student requests to their handlers.
    pub mediator: Arc<Mediator>,
    /// Credentials checked by the basic-auth middleware.
    pub credentials: BasicAuthCredentials,
}

impl AppState {
    /// Creates AppState from the configured storage and cache backends.
    pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let repository = open_repository(config).await?;

        let repository: Arc<dyn StudentRepository> = if config.cache_enabled {
            let cache = open_cache(config).await?;
            tracing::info!(
                ttl_seconds = config.cache_ttl_seconds,
                max_entries = config.cache_max_entries,
                "Student cache enabled"
            );
            Arc::new(CachedStudentRepository::new(
                repository,
                cache,
                config.cache_ttl(),
            ))
        } else {
            tracing::info!("Student cache disabled");
            repository
        };

        Self::from_repository(repository, config.basic_auth.clone())
    }

    /// Creates AppState over an already opened repository.
    pub fn from_repository(
        repository: Arc<dyn StudentRepository>,
        credentials: BasicAuthCredentials,
    ) -> Result<Self, anyhow::Error> {
        let mediator = build_mediator(repository)?;

        Ok(Self {
            mediator: Arc::new(mediator),
            credentials,
        })
    }
}

// ============================================================================
// Backend factories
// ============================================================================

#[cfg(feature = "sqlite")]
async fn open_repository(config: &Config) -> Result<Arc<dyn StudentRepository>, anyhow::Error> {
    use crate::storage::SqliteRepository;

    let repository = SqliteRepository::new(&config.sqlite_path).await?;
    tracing::info!(path = %config.sqlite_path, "Opened SQLite student store");
    Ok(Arc::new(repository))
}

#[cfg(feature = "inmemory")]
async fn open_repository(_config: &Config) -> Result<Arc<dyn StudentRepository>, anyhow::Error> {
    use crate::storage::InMemoryRepository;

    tracing::warn!("Using in-memory student store, data is lost on restart");
    Ok(Arc::new(InMemoryRepository::new()))
}

#[cfg(feature = "memory")]
async fn open_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    use crate::cache::MemoryCache;

    Ok(Arc::new(MemoryCache::new(config.cache_max_entries)))
}

#[cfg(feature = "redis")]
async fn open_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    use crate::cache::RedisCache;

    let cache = RedisCache::new(&config.redis_url).await?;
    tracing::info!(url = %config.redis_url, "Connected to Redis cache");
    Ok(Arc::new(cache))
}
