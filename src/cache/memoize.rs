//! Cache-first memoization of async functions
//!
//! [`Memoized`] wraps a function so calls with the same arguments reuse a
//! stored result inside one namespace until the TTL runs out (Redis) or the
//! namespace is invalidated. Invalidation is explicit: after writing an entity,
//! call [`Memoized::invalidate`] or [`invalidate_cache`] for its namespace.
//!
//! ```no_run
//! use underwrite_cache::cache::{Cache, Memoized, Namespace, Ttl};
//!
//! # async fn load_deal_from_db(id: u64) -> serde_json::Value { serde_json::json!({"id": id}) }
//! # async fn example(cache: Cache) {
//! let get_deal = Memoized::new(cache, Namespace::Deals, Ttl::Long, |(id,): (u64,)| {
//!     load_deal_from_db(id)
//! });
//!
//! let deal = get_deal.call((42,)).await;
//! get_deal.invalidate("*").await;
//! # }
//! ```

use super::fingerprint::FingerprintArgs;
use super::keys::Ttl;
use super::provider::{Cache, CacheBackend};
use super::traits::CacheService;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use tracing::debug;

/// A function wrapped with cache-first execution
pub struct Memoized<F, S = CacheBackend> {
    cache: Cache<S>,
    namespace: String,
    ttl: Ttl,
    func: F,
}

impl<F, S: std::fmt::Debug> std::fmt::Debug for Memoized<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("namespace", &self.namespace)
            .field("ttl", &self.ttl)
            .field("cache", &self.cache)
            .finish()
    }
}

impl<F, S: CacheService> Memoized<F, S> {
    pub fn new(cache: Cache<S>, namespace: impl AsRef<str>, ttl: impl Into<Ttl>, func: F) -> Self {
        Self {
            cache,
            namespace: namespace.as_ref().to_string(),
            ttl: ttl.into(),
            func,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Return the cached result for `args`, or compute, store, and return it
    ///
    /// The result must round-trip through JSON; a value that cannot be stored
    /// is still returned, it just is not cached.
    ///
    /// Every result is stored, including `None` from a lookup returning
    /// `Option<T>`. On the local store that "not found" stays cached until the
    /// namespace is invalidated, so invalidate after creating the entity.
    pub async fn call<A, Fut, R>(&self, args: A) -> R
    where
        A: FingerprintArgs,
        F: Fn(A) -> Fut,
        Fut: Future<Output = R>,
        R: Serialize + DeserializeOwned,
    {
        let key = args.fingerprint();

        if let Some(cached) = self.cache.get::<R>(&self.namespace, key.as_str()).await {
            debug!(namespace = %self.namespace, key = %key, "Memoized result reused");
            return cached;
        }

        let result = (self.func)(args).await;

        self.cache
            .set(&self.namespace, key.as_str(), &result, self.ttl)
            .await;
        debug!(namespace = %self.namespace, key = %key, "Memoized result computed");

        result
    }

    /// Like [`call`](Self::call) for fallible functions; only `Ok` values are stored
    pub async fn try_call<A, Fut, R, E>(&self, args: A) -> Result<R, E>
    where
        A: FingerprintArgs,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        R: Serialize + DeserializeOwned,
    {
        let key = args.fingerprint();

        if let Some(cached) = self.cache.get::<R>(&self.namespace, key.as_str()).await {
            debug!(namespace = %self.namespace, key = %key, "Memoized result reused");
            return Ok(cached);
        }

        let result = (self.func)(args).await?;

        self.cache
            .set(&self.namespace, key.as_str(), &result, self.ttl)
            .await;
        debug!(namespace = %self.namespace, key = %key, "Memoized result computed");

        Ok(result)
    }

    /// Evict memoized results in this namespace matching `pattern`
    pub async fn invalidate(&self, pattern: &str) -> u64 {
        invalidate_cache(&self.cache, &self.namespace, pattern).await
    }
}

/// Evict every entry under `prefix` matching `pattern` (use `"*"` for all)
pub async fn invalidate_cache<S: CacheService>(
    cache: &Cache<S>,
    prefix: impl AsRef<str>,
    pattern: &str,
) -> u64 {
    let prefix = prefix.as_ref();
    let deleted = cache.delete_pattern(prefix, pattern).await;
    debug!(
        prefix = prefix,
        pattern = pattern,
        deleted = deleted,
        "Cache invalidated"
    );
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fingerprint::CallArgs;
    use crate::cache::keys::{Namespace, ALL_KEYS};
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Borrower {
        id: u64,
        name: String,
    }

    fn counting_loader(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn((u64,)) -> std::future::Ready<Borrower> {
        move |(id,): (u64,)| {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Borrower {
                id,
                name: format!("borrower-{id}"),
            })
        }
    }

    #[tokio::test]
    async fn test_same_arguments_invoke_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let memo = Memoized::new(
            Cache::local(),
            Namespace::Borrowers,
            Ttl::Medium,
            counting_loader(Arc::clone(&calls)),
        );

        let first = memo.call((7,)).await;
        let second = memo.call((7,)).await;

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_arguments_invoke_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let memo = Memoized::new(
            Cache::local(),
            Namespace::Borrowers,
            Ttl::Medium,
            counting_loader(Arc::clone(&calls)),
        );

        memo.call((1,)).await;
        memo.call((2,)).await;
        memo.call((1,)).await;
        memo.call((2,)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let calls = Arc::new(AtomicUsize::new(0));
        let memo = Memoized::new(
            Cache::local(),
            Namespace::Borrowers,
            Ttl::Medium,
            counting_loader(Arc::clone(&calls)),
        );

        memo.call((1,)).await;
        assert_eq!(memo.invalidate(ALL_KEYS).await, 1);
        memo.call((1,)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_result_is_stored_under_fingerprint() {
        let cache = Cache::local();
        let memo = Memoized::new(cache.clone(), "reports", Ttl::Short, |args: CallArgs| {
            std::future::ready(format!("{:?}", args))
        });

        let args = CallArgs::new().arg("q3").kwarg("format", "pdf");
        let key = args.fingerprint();
        let result = memo.call(args).await;

        let stored: Option<String> = cache.get("reports", key.as_str()).await;
        assert_eq!(stored, Some(result));
    }

    #[tokio::test]
    async fn test_try_call_does_not_cache_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memo = Memoized::new(Cache::local(), Namespace::Deals, Ttl::Short, move |(id,): (u64,)| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(format!("deal {id} temporarily unavailable"))
                } else {
                    Ok(id * 10)
                }
            }
        });

        assert!(memo.try_call((4,)).await.is_err());
        assert_eq!(memo.try_call((4,)).await, Ok(40));
        assert_eq!(memo.try_call((4,)).await, Ok(40));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_cached_until_invalidated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let exists = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let (counter, created) = (Arc::clone(&calls), Arc::clone(&exists));
        let memo = Memoized::new(Cache::local(), Namespace::Users, Ttl::Short, move |(id,): (u64,)| {
            counter.fetch_add(1, Ordering::SeqCst);
            let found = created.load(Ordering::SeqCst).then(|| format!("user-{id}"));
            std::future::ready(found)
        });

        assert_eq!(memo.call((5,)).await, None);
        exists.store(true, Ordering::SeqCst);
        assert_eq!(memo.call((5,)).await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        memo.invalidate(ALL_KEYS).await;
        assert_eq!(memo.call((5,)).await, Some("user-5".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_cache_leaves_other_namespaces() {
        let cache = Cache::local();
        cache.set_default("deals", "1", &1).await;
        cache.set_default("users", "1", &1).await;

        assert_eq!(invalidate_cache(&cache, Namespace::Deals, ALL_KEYS).await, 1);

        assert_eq!(cache.get::<i32>("deals", "1").await, None);
        assert_eq!(cache.get::<i32>("users", "1").await, Some(1));
    }
}
