//! Shape cache implementation
//!
//! Each key owns its own lock, so the read-validate-write cycle for one
//! endpoint is atomic while different endpoints proceed concurrently.

use super::types::{CacheEntry, CacheKey, Observation, Outcome};
use super::validator::{JsonSchemaValidator, ShapeValidator};
use crate::error::Result;
use crate::schema::SchemaInferrer;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Keyed store of the last accepted response per endpoint
pub struct ShapeCache {
    inferrer: SchemaInferrer,
    validator: Arc<dyn ShapeValidator>,
    slots: RwLock<HashMap<CacheKey, Slot>>,
}

impl std::fmt::Debug for ShapeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeCache")
            .field("inferrer", &self.inferrer)
            .finish_non_exhaustive()
    }
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeCache {
    /// Create an empty cache with default inference and the draft-07 validator
    pub fn new() -> Self {
        Self::with_parts(SchemaInferrer::new(), Arc::new(JsonSchemaValidator::new()))
    }

    /// Create an empty cache with a custom inferrer
    pub fn with_inferrer(inferrer: SchemaInferrer) -> Self {
        Self::with_parts(inferrer, Arc::new(JsonSchemaValidator::new()))
    }

    /// Create an empty cache from an inferrer and a validator
    pub fn with_parts(inferrer: SchemaInferrer, validator: Arc<dyn ShapeValidator>) -> Self {
        Self {
            inferrer,
            validator,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Record a response body for `method endpoint` and decide what to return
    ///
    /// When a stored schema accepts `data`, the stored data is returned.
    /// Otherwise `data` is inferred, stored, and returned unchanged. An
    /// inference error leaves the existing entry untouched.
    pub async fn observe(&self, method: &str, endpoint: &str, data: Value) -> Result<Observation> {
        let key = CacheKey::new(method, endpoint);
        let slot = self.slot(&key).await;
        let mut entry = slot.lock().await;

        if let Some(stored) = entry.as_ref() {
            match self.validator.conforms(&stored.schema, &data) {
                Ok(true) => {
                    tracing::debug!(key = %key, "Shape matched, replaying stored response");
                    return Ok(Observation {
                        data: stored.data.clone(),
                        outcome: Outcome::Hit,
                    });
                }
                Ok(false) => {
                    tracing::debug!(key = %key, "Shape changed, re-inferring");
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Stored schema unusable, re-inferring");
                }
            }
        }

        let schema = self.inferrer.infer(&data)?;
        let outcome = if entry.is_some() {
            Outcome::Replaced
        } else {
            Outcome::Miss
        };

        tracing::debug!(key = %key, outcome = outcome.as_str(), "Stored new shape");
        *entry = Some(CacheEntry {
            data: data.clone(),
            schema,
        });

        Ok(Observation { data, outcome })
    }

    /// Get the entry stored for `method endpoint`
    pub async fn get(&self, method: &str, endpoint: &str) -> Option<CacheEntry> {
        let key = CacheKey::new(method, endpoint);
        let slot = self.slots.read().await.get(&key).cloned()?;
        let entry = slot.lock().await;
        entry.clone()
    }

    /// All stored entries, sorted by key
    pub async fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        let slots: Vec<(CacheKey, Slot)> = self
            .slots
            .read()
            .await
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(slot)))
            .collect();

        let mut entries = Vec::with_capacity(slots.len());
        for (key, slot) in slots {
            if let Some(entry) = slot.lock().await.clone() {
                entries.push((key, entry));
            }
        }
        entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        entries
    }

    /// Keys with a stored entry, sorted
    pub async fn keys(&self) -> Vec<CacheKey> {
        self.entries().await.into_iter().map(|(key, _)| key).collect()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries().await.len()
    }

    /// Check if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove every entry
    pub async fn clear(&self) {
        self.slots.write().await.clear();
    }

    async fn slot(&self, key: &CacheKey) -> Slot {
        if let Some(slot) = self.slots.read().await.get(key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}
