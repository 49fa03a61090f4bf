//! Short-lived cache for picker payloads
//!
//! Asynchronous widgets (the table picker, remote tag lookups) receive only a
//! `data-key` token in the rendered markup. They send it back later and read
//! the field configuration stored under that token.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Key-value store with per-entry expiry.
#[async_trait]
pub trait OptionCache: Send + Sync {
	/// Store `value` under `key` for `ttl`, replacing any previous value
	async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

	/// Fetch a value that has not expired yet
	async fn get(&self, key: &str) -> Result<Option<Value>>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
	value: Value,
	expires_at: Option<SystemTime>,
}

impl CacheEntry {
	// A TTL past the end of representable time never expires.
	fn new(value: Value, ttl: Duration) -> Self {
		Self {
			value,
			expires_at: SystemTime::now().checked_add(ttl),
		}
	}

	fn is_expired(&self) -> bool {
		self.expires_at
			.is_some_and(|expires_at| SystemTime::now() > expires_at)
	}
}

/// In-memory cache backend
///
/// Clones share the same store.
///
/// # Examples
///
/// ```
/// use reinhardt_multiple_field::cache::{InMemoryOptionCache, OptionCache};
/// use serde_json::json;
/// use std::time::Duration;
///
/// # async fn example() {
/// let cache = InMemoryOptionCache::new();
/// cache.put("token", json!({"related": "tags"}), Duration::from_secs(60)).await.unwrap();
///
/// let value = cache.get("token").await.unwrap();
/// assert_eq!(value, Some(json!({"related": "tags"})));
/// # }
/// ```
#[derive(Clone, Default)]
pub struct InMemoryOptionCache {
	store: Arc<RwLock<HashMap<String, CacheEntry>>>,
	writes: Arc<AtomicU64>,
}

impl InMemoryOptionCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored entries, expired ones included until cleanup
	pub async fn len(&self) -> usize {
		self.store.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.store.read().await.is_empty()
	}

	/// Total number of `put` calls served
	pub fn writes(&self) -> u64 {
		self.writes.load(Ordering::Relaxed)
	}

	/// Drop expired entries
	pub async fn cleanup_expired(&self) {
		let mut store = self.store.write().await;
		store.retain(|_, entry| !entry.is_expired());
	}
}

#[async_trait]
impl OptionCache for InMemoryOptionCache {
	async fn put(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
		let mut store = self.store.write().await;
		store.insert(key.to_string(), CacheEntry::new(value, ttl));
		self.writes.fetch_add(1, Ordering::Relaxed);
		Ok(())
	}

	async fn get(&self, key: &str) -> Result<Option<Value>> {
		let store = self.store.read().await;
		Ok(store
			.get(key)
			.filter(|entry| !entry.is_expired())
			.map(|entry| entry.value.clone()))
	}
}
