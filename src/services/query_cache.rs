//! Query result cache.
//!
//! Results are keyed by query name plus filter parameters and live until a
//! mutation invalidates them; there is no time-based expiry.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Composite cache key: query name plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub name: String,
    pub params: Vec<String>,
}

impl QueryKey {
    pub fn new(name: impl Into<String>, params: &[String]) -> Self {
        Self {
            name: name.into(),
            params: params.to_vec(),
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for param in &self.params {
            write!(f, "/{}", param)?;
        }
        Ok(())
    }
}

/// Lifecycle of a query as a view sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Success(T),
    Error(AppError),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T, AppError>> for QueryState<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Error(err),
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<QueryKey, serde_json::Value>,
    /// Bumped on every invalidation of a query name.
    generations: HashMap<String, u64>,
}

impl CacheInner {
    fn generation(&self, name: &str) -> u64 {
        self.generations.get(name).copied().unwrap_or(0)
    }
}

/// Shared cache of successful query results, stored as JSON.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for a key, if present and decodable.
    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let inner = self.inner.read().await;
        let value = inner.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Dropping undecodable cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Store a value under a key.
    pub async fn insert<T: Serialize>(&self, key: QueryKey, data: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(data)?;
        self.inner.write().await.entries.insert(key, value);
        Ok(())
    }

    /// Return the cached value or run `fetch` and cache a successful result.
    ///
    /// Errors are returned to the caller and never cached. A result whose
    /// query was invalidated while it was being fetched is returned but not
    /// cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(data) = self.get(&key).await {
            log::debug!("cache hit {}", key);
            return Ok(data);
        }

        log::debug!("cache miss {}", key);
        let started_at = self.inner.read().await.generation(&key.name);
        let data = fetch().await?;

        let value = serde_json::to_value(&data)?;
        let mut inner = self.inner.write().await;
        if inner.generation(&key.name) == started_at {
            inner.entries.insert(key, value);
        } else {
            log::debug!("not caching {}: invalidated during fetch", key);
        }
        Ok(data)
    }

    /// Drop every entry of the named query, whatever its parameters.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, name: &str) -> usize {
        let mut inner = self.inner.write().await;
        *inner.generations.entry(name.to_string()).or_insert(0) += 1;
        let before = inner.entries.len();
        inner.entries.retain(|key, _| key.name != name);
        let removed = before - inner.entries.len();
        log::debug!("invalidated {} entries of {}", removed, name);
        removed
    }

    /// Whether an entry exists for the key.
    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.inner.read().await.entries.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}
