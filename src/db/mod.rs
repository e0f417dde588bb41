pub mod cache;
pub mod in_memory;
pub mod postgres;
pub mod store;

pub use cache::create_redis_client;
pub use cache::Cache;
pub use cache::CacheBackend;
pub use cache::CacheKey;
pub use in_memory::InMemoryStore;
pub use postgres::{create_pool, PgStore};
pub use store::{ListStore, ProfileStore};
