//! # Request Cache
//!
//! Keyed store of fetched collections and report views. Each key carries a
//! generation counter published through a `watch` channel: mutations bump
//! the generations of the keys they invalidate, and subscribers learn that
//! their view is stale without polling.
//!
//! A fetch records the generation it started under. If the key was
//! invalidated while the fetch was in flight, the result is handed back to
//! the caller but not cached.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;
use tracing::debug;

/// Cached collections and derived views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Animals,
    Staff,
    DietTypes,
    Diets,
    MedicalChecks,
    AnimalFullInfo,
    MarriedCouples,
    AnimalsWithDiets,
}

impl CacheKey {
    pub const ALL: [CacheKey; 8] = [
        CacheKey::Animals,
        CacheKey::Staff,
        CacheKey::DietTypes,
        CacheKey::Diets,
        CacheKey::MedicalChecks,
        CacheKey::AnimalFullInfo,
        CacheKey::MarriedCouples,
        CacheKey::AnimalsWithDiets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Animals => "animals",
            CacheKey::Staff => "staff",
            CacheKey::DietTypes => "diet-types",
            CacheKey::Diets => "diets",
            CacheKey::MedicalChecks => "medical-checks",
            CacheKey::AnimalFullInfo => "animal-full-info",
            CacheKey::MarriedCouples => "married-couples",
            CacheKey::AnimalsWithDiets => "animals-with-diets",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Animal,
    Staff,
    DietType,
    Diet,
    MedicalCheck,
}

/// Keys a successful mutation of `kind` makes stale
pub fn invalidated_by(kind: EntityKind) -> &'static [CacheKey] {
    match kind {
        EntityKind::Animal => &[
            CacheKey::Animals,
            CacheKey::AnimalFullInfo,
            CacheKey::AnimalsWithDiets,
        ],
        EntityKind::Staff => &[
            CacheKey::Staff,
            CacheKey::MarriedCouples,
            CacheKey::AnimalFullInfo,
        ],
        EntityKind::DietType => &[
            CacheKey::DietTypes,
            CacheKey::AnimalFullInfo,
            CacheKey::AnimalsWithDiets,
        ],
        EntityKind::Diet => &[
            CacheKey::Diets,
            CacheKey::AnimalFullInfo,
            CacheKey::AnimalsWithDiets,
        ],
        EntityKind::MedicalCheck => &[CacheKey::MedicalChecks, CacheKey::AnimalFullInfo],
    }
}

struct Entry {
    generation: u64,
    value: Arc<dyn Any + Send + Sync>,
}

struct Inner {
    entries: RwLock<HashMap<(CacheKey, String), Entry>>,
    generations: HashMap<CacheKey, watch::Sender<u64>>,
}

/// Cheap to clone, all clones share one cache
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        let generations = CacheKey::ALL
            .iter()
            .map(|key| {
                let (tx, _) = watch::channel(0u64);
                (*key, tx)
            })
            .collect();
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(HashMap::new()),
                generations,
            }),
        }
    }

    /// Current generation of `key`
    pub fn generation(&self, key: CacheKey) -> u64 {
        self.inner
            .generations
            .get(&key)
            .map(|tx| *tx.borrow())
            .unwrap_or_default()
    }

    /// Receives the new generation every time `key` is invalidated
    pub fn subscribe(&self, key: CacheKey) -> watch::Receiver<u64> {
        match self.inner.generations.get(&key) {
            Some(tx) => tx.subscribe(),
            None => watch::channel(0u64).1,
        }
    }

    pub fn is_cached(&self, key: CacheKey, variant: &str) -> bool {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&(key, variant.to_string()))
    }

    /// Returns the cached value for `(key, variant)` or runs `fetch`.
    ///
    /// `variant` separates parameterised views of one key, such as a search
    /// term. Errors are returned as-is and never cached.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: CacheKey,
        variant: &str,
        fetch: F,
    ) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.lookup::<T>(key, variant) {
            debug!("Cache hit: {} [{}]", key.as_str(), variant);
            return Ok(hit);
        }

        let started = self.generation(key);
        debug!("Cache miss: {} [{}] at generation {}", key.as_str(), variant, started);
        let value = Arc::new(fetch().await?);

        let mut entries = self
            .inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.generation(key) == started {
            entries.insert(
                (key, variant.to_string()),
                Entry {
                    generation: started,
                    value: value.clone() as Arc<dyn Any + Send + Sync>,
                },
            );
        } else {
            debug!("Discarding stale fetch of {} [{}]", key.as_str(), variant);
        }

        Ok(value)
    }

    /// Drops every cached variant of `key` and notifies subscribers
    pub fn invalidate(&self, key: CacheKey) {
        let mut entries = self
            .inner
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.retain(|(cached, _), _| *cached != key);
        if let Some(tx) = self.inner.generations.get(&key) {
            tx.send_modify(|generation| *generation += 1);
        }
        debug!("Invalidated {}", key.as_str());
    }

    pub fn invalidate_all(&self, keys: &[CacheKey]) {
        for key in keys {
            self.invalidate(*key);
        }
    }

    fn lookup<T: Send + Sync + 'static>(&self, key: CacheKey, variant: &str) -> Option<Arc<T>> {
        let current = self.generation(key);
        let entries = self
            .inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&(key, variant.to_string()))?;
        if entry.generation != current {
            return None;
        }
        Arc::clone(&entry.value).downcast::<T>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_fetch(CacheKey::Animals, "", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(*value, vec![1, 2, 3]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch_and_notifies() {
        let cache = QueryCache::new();
        let mut rx = cache.subscribe(CacheKey::Staff);

        cache
            .get_or_fetch(CacheKey::Staff, "", || async { Ok::<_, ()>(1u32) })
            .await
            .unwrap();
        assert!(cache.is_cached(CacheKey::Staff, ""));

        cache.invalidate(CacheKey::Staff);
        assert!(!cache.is_cached(CacheKey::Staff, ""));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);

        let value = cache
            .get_or_fetch(CacheKey::Staff, "", || async { Ok::<_, ()>(2u32) })
            .await
            .unwrap();
        assert_eq!(*value, 2);
    }

    #[tokio::test]
    async fn test_variants_are_cached_separately() {
        let cache = QueryCache::new();
        cache
            .get_or_fetch(CacheKey::AnimalFullInfo, "leo", || async { Ok::<_, ()>("leo") })
            .await
            .unwrap();
        assert!(!cache.is_cached(CacheKey::AnimalFullInfo, ""));

        cache.invalidate(CacheKey::AnimalFullInfo);
        assert!(!cache.is_cached(CacheKey::AnimalFullInfo, "leo"));
    }

    #[tokio::test]
    async fn test_fetch_started_before_invalidation_is_not_cached() {
        let cache = QueryCache::new();
        let value = cache
            .get_or_fetch(CacheKey::Diets, "", || {
                // A mutation lands while the fetch is in flight
                cache.invalidate(CacheKey::Diets);
                async { Ok::<_, ()>("stale") }
            })
            .await
            .unwrap();
        assert_eq!(*value, "stale");
        assert!(!cache.is_cached(CacheKey::Diets, ""));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::new();
        let result = cache
            .get_or_fetch(CacheKey::Animals, "", || async { Err::<u8, _>("offline") })
            .await;
        assert_eq!(result.unwrap_err(), "offline");
        assert!(!cache.is_cached(CacheKey::Animals, ""));
    }

    #[test]
    fn test_invalidation_table() {
        assert!(invalidated_by(EntityKind::Staff).contains(&CacheKey::MarriedCouples));
        assert!(!invalidated_by(EntityKind::MedicalCheck).contains(&CacheKey::AnimalsWithDiets));
        for kind in [
            EntityKind::Animal,
            EntityKind::Staff,
            EntityKind::DietType,
            EntityKind::Diet,
            EntityKind::MedicalCheck,
        ] {
            assert!(invalidated_by(kind).contains(&CacheKey::AnimalFullInfo));
        }
    }
}
