use std::sync::Arc;

use axum::http::HeaderName;

use crate::{
    config::Config,
    db::{
        cache::CacheWriterHandle, create_pool, create_redis_client, Cache, CacheBackend,
        InMemoryStore, ListStore, PgStore, ProfileStore,
    },
    services::{MovieProvider, TmdbProvider},
};

/// Request-handling settings derived from configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub session_ttl_secs: u64,
    pub auth_header: HeaderName,
    pub secure_cookies: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let auth_header = HeaderName::from_bytes(config.auth_header.to_lowercase().as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid AUTH_HEADER '{}': {}", config.auth_header, e))?;

        Ok(Self {
            session_ttl_secs: config.session_ttl_secs,
            auth_header,
            secure_cookies: config.secure_cookies,
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MovieProvider>,
    pub cache: Cache,
    pub lists: Arc<dyn ListStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        cache: Cache,
        lists: Arc<dyn ListStore>,
        profiles: Arc<dyn ProfileStore>,
        settings: Settings,
    ) -> Self {
        Self {
            provider,
            cache,
            lists,
            profiles,
            settings: Arc::new(settings),
        }
    }

    /// Connects every backend named in `config`, falling back to in-process
    /// backends for the ones left unset.
    ///
    /// Must be called from within a Tokio runtime. The returned handle flushes
    /// queued cache writes on shutdown.
    pub async fn from_config(config: &Config) -> anyhow::Result<(Self, CacheWriterHandle)> {
        let settings = Settings::from_config(config)?;

        let backend = match &config.redis_url {
            Some(url) => CacheBackend::Redis(create_redis_client(url)?),
            None => {
                tracing::warn!("REDIS_URL not set, cache and sessions kept in memory");
                CacheBackend::Memory(Default::default())
            }
        };
        let (cache, writer) = Cache::new(backend);

        let (lists, profiles): (Arc<dyn ListStore>, Arc<dyn ProfileStore>) =
            match &config.database_url {
                Some(url) => {
                    let store = Arc::new(PgStore::new(create_pool(url).await?));
                    let lists: Arc<dyn ListStore> = store.clone();
                    let profiles: Arc<dyn ProfileStore> = store;
                    (lists, profiles)
                }
                None => {
                    tracing::warn!("DATABASE_URL not set, lists and profiles kept in memory");
                    let store = Arc::new(InMemoryStore::new());
                    let lists: Arc<dyn ListStore> = store.clone();
                    let profiles: Arc<dyn ProfileStore> = store;
                    (lists, profiles)
                }
            };

        let provider = Arc::new(TmdbProvider::new(
            cache.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.movie_cache_ttl_secs,
        ));

        Ok((Self::new(provider, cache, lists, profiles, settings), writer))
    }
}
