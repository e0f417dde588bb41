/// Read-through caching for provider lookups.
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$fetch`,
/// queues the result for a background cache write with `$ttl` seconds to live,
/// and returns it. A failed cache read is logged and treated as a miss; a failed
/// fetch is propagated with `?`.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::MovieDetails(id), self.cache_ttl, self.fetch_details(id))
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
                let value = $fetch.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
