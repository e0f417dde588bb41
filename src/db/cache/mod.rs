pub mod client;
pub mod memory;

mod macros;

pub use client::create_redis_client;
pub use client::Cache;
pub use client::CacheBackend;
pub use client::CacheKey;
pub use client::CacheWriterHandle;
pub use memory::MemoryStore;
