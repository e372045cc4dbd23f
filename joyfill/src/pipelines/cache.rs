//! Process-wide model cache.
//!
//! Models are loaded once and shared read-only by every pipeline built afterwards. Entries
//! live until the process exits.

use crate::error::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub(crate) trait ModelOptions {
    fn cache_key(&self) -> String;
}

type CacheStorage = HashMap<(TypeId, String), Arc<dyn Any + Send + Sync>>;

pub(crate) struct ModelCache {
    cache: Mutex<CacheStorage>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached model for `key`, loading it with `loader` on first use.
    ///
    /// The lock is held while loading so two builders racing on the same key load once.
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = cache.get(&cache_key) {
            if let Ok(model) = Arc::clone(cached).downcast::<M>() {
                tracing::debug!(key, "model cache hit");
                return Ok(model);
            }
        }

        tracing::info!(key, "loading model");
        let model = Arc::new(loader()?);
        cache.insert(cache_key, Arc::clone(&model) as Arc<dyn Any + Send + Sync>);

        Ok(model)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

pub(crate) fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    struct TestModel {
        id: String,
    }

    #[test]
    fn returns_same_instance() {
        let cache = ModelCache::new();
        let model1 = cache
            .get_or_create("test", || {
                Ok(TestModel {
                    id: "original".into(),
                })
            })
            .unwrap();
        let model2 = cache
            .get_or_create("test", || Ok(TestModel { id: "new".into() }))
            .unwrap();
        assert_eq!(model2.id, "original");
        assert!(Arc::ptr_eq(&model1, &model2));
    }

    #[test]
    fn different_keys_independent() {
        let cache = ModelCache::new();
        let first = cache
            .get_or_create("key1", || Ok(TestModel { id: "first".into() }))
            .unwrap();
        let second = cache
            .get_or_create("key2", || {
                Ok(TestModel {
                    id: "second".into(),
                })
            })
            .unwrap();

        assert_eq!(first.id, "first");
        assert_eq!(second.id, "second");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = ModelCache::new();
        let failed = cache.get_or_create::<TestModel, _>("flaky", || {
            Err(PipelineError::Download("offline".into()))
        });
        assert!(failed.is_err());
        assert_eq!(cache.len(), 0);

        let loaded = cache
            .get_or_create("flaky", || Ok(TestModel { id: "ok".into() }))
            .unwrap();
        assert_eq!(loaded.id, "ok");
    }
}
