use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::memory::MemoryStore;
use crate::error::AppError;
use crate::error::AppResult;
use crate::models::MovieId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetails(MovieId),
    MovieCredits(MovieId),
    Session(Uuid),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails(id) => write!(f, "movie_details_{}", id),
            CacheKey::MovieCredits(id) => write!(f, "movie_credits_and_director_{}", id),
            CacheKey::Session(id) => write!(f, "session_{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Where cached values live
#[derive(Clone)]
pub enum CacheBackend {
    Redis(Client),
    Memory(MemoryStore),
}

impl CacheBackend {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match self {
            CacheBackend::Redis(client) => {
                let mut conn = client.get_multiplexed_async_connection().await?;
                let value: Option<String> = conn.get(key).await?;
                Ok(value)
            }
            CacheBackend::Memory(store) => Ok(store.get(key).await),
        }
    }

    async fn set_ex(&self, key: String, value: String, ttl: u64) -> AppResult<()> {
        match self {
            CacheBackend::Redis(client) => {
                let mut conn = client.get_multiplexed_async_connection().await?;
                let _: () = conn.set_ex(key, value, ttl).await?;
            }
            CacheBackend::Memory(store) => store.set_ex(key, value, ttl).await,
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> AppResult<()> {
        match self {
            CacheBackend::Redis(client) => {
                let mut conn = client.get_multiplexed_async_connection().await?;
                let _: () = conn.del(key).await?;
            }
            CacheBackend::Memory(store) => store.del(key).await,
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        match self {
            CacheBackend::Redis(_) => "redis",
            CacheBackend::Memory(_) => "memory",
        }
    }
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Shared TTL cache for provider lookups and session data
#[derive(Clone)]
pub struct Cache {
    backend: CacheBackend,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until it has flushed queued writes
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Creates a cache over `backend` and spawns its background writer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(backend: CacheBackend) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tracing::info!(backend = backend.name(), "Cache initialised");

        let writer_backend = backend.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(writer_backend, write_rx, shutdown_rx).await;
        });

        let cache = Self { backend, write_tx };
        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    /// Cache backed by an in-process store
    pub fn in_memory() -> (Self, CacheWriterHandle) {
        Self::new(CacheBackend::Memory(MemoryStore::new()))
    }

    /// Drains write messages until every sender is gone or shutdown is requested.
    /// On shutdown, whatever is already queued is written before exiting.
    async fn cache_writer_task(
        backend: CacheBackend,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                msg = write_rx.recv() => {
                    let Some(msg) = msg else { break };
                    Self::write(&backend, msg).await;
                }
                Some(()) = shutdown_rx.recv() => {
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        Self::write(&backend, msg).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Cache writer flushed pending writes");
                    break;
                }
            }
        }

        tracing::info!("Cache writer task stopped");
    }

    async fn write(backend: &CacheBackend, msg: CacheWriteMessage) {
        let key = msg.key.clone();
        if let Err(e) = backend.set_ex(msg.key, msg.value, msg.ttl).await {
            tracing::error!(error = %e, key = %key, "Failed to write to cache");
        }
    }

    /// Retrieves and deserializes a cached value, `None` on miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        match self.backend.get(&key.to_string()).await? {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a write for the background writer and returns immediately.
    ///
    /// Failures are logged, never reported to the caller.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }

    /// Writes a value and waits for the backend to acknowledge it
    pub async fn set<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;
        self.backend.set_ex(key.to_string(), json, ttl).await
    }

    pub async fn remove(&self, key: &CacheKey) -> AppResult<()> {
        self.backend.del(&key.to_string()).await
    }
}
