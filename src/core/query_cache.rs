use crate::utils::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;

/// 查詢參數組成的快取鍵，例如 `["serviceList", "rec123"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, T>(parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Query results cached by key until explicitly invalidated.
///
/// Failed fetches are never stored, and nothing is retried: the next
/// `fetch` for the same key simply calls the fetcher again.
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, V>,
    stats: CacheStats,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fetch<F, Fut>(&mut self, key: QueryKey, fetcher: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.entries.get(&key) {
            self.stats.hits += 1;
            tracing::debug!("Query cache hit for {}", key);
            return Ok(value.clone());
        }

        self.stats.misses += 1;
        tracing::debug!("Query cache miss for {}, fetching", key);
        let value = fetcher().await?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::debug!("Invalidated query {}", key);
        }
        removed
    }

    /// 清除所有以 `prefix` 開頭的鍵，回傳清除數量
    pub fn invalidate_prefix(&mut self, prefix: &QueryKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
