/// A macro to simplify read-through caching.
///
/// Checks the cache for `$key`. On a hit the cached value is returned.
/// On a miss the provided future is awaited, its value stored under `$key`
/// with the cache's TTL, and then returned.
///
/// # Arguments
/// * `$cache`: The [`Cache`](crate::cache::Cache) instance to read and write.
/// * `$key`: The [`CacheKey`](crate::cache::CacheKey) for the value.
/// * `$block`: Future yielding `AppResult<T>`, awaited only on a miss.
///
/// # Example
/// ```rust,ignore
/// async fn lookup(&self, key: CacheKey) -> AppResult<LocationInfo> {
///     cached!(self.cache, key, async move { fetch_location().await })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            $cache.set(&key, &value).await;
            Ok(value)
        }
    }};
}

/// Like [`cached!`], but for lookups that may legitimately find nothing.
///
/// The future yields `AppResult<Option<T>>`; only `Some` values are stored, so a
/// later call retries the upstream instead of replaying the miss.
#[macro_export]
macro_rules! cached_if_found {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            tracing::debug!(key = %key, "Cache hit");
            Ok(Some(cached))
        } else {
            tracing::debug!(key = %key, "Cache miss");
            let value = $block.await?;
            if let Some(found) = &value {
                $cache.set(&key, found).await;
            }
            Ok(value)
        }
    }};
}
