//! Shape cache tests

use super::*;
use crate::error::{Error, Result};
use crate::schema::{JsonSchema, SchemaInferrer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_first_observation_is_a_miss() {
    let cache = ShapeCache::new();

    let obs = cache
        .observe("get", "/users", json!({"id": 1}))
        .await
        .unwrap();

    assert_eq!(obs.outcome, Outcome::Miss);
    assert_eq!(obs.data, json!({"id": 1}));

    let entry = cache.get("GET", "/users").await.unwrap();
    assert_eq!(entry.data, json!({"id": 1}));
    assert!(entry.schema.get_property("id").is_some());
}

#[tokio::test]
async fn test_same_shape_replays_stored_data() {
    let cache = ShapeCache::new();

    cache
        .observe("GET", "/users", json!({"id": 1, "name": "Alice"}))
        .await
        .unwrap();
    let obs = cache
        .observe("get", "/users", json!({"id": 2, "name": "Bob"}))
        .await
        .unwrap();

    assert_eq!(obs.outcome, Outcome::Hit);
    assert_eq!(obs.data, json!({"id": 1, "name": "Alice"}));
}

#[tokio::test]
async fn test_changed_shape_overwrites_entry() {
    let cache = ShapeCache::new();

    cache
        .observe("GET", "/users", json!({"id": 1}))
        .await
        .unwrap();
    let obs = cache
        .observe("GET", "/users", json!({"id": "one"}))
        .await
        .unwrap();

    assert_eq!(obs.outcome, Outcome::Replaced);
    assert_eq!(obs.data, json!({"id": "one"}));

    // The replacement is what later requests replay
    let obs = cache
        .observe("GET", "/users", json!({"id": "two"}))
        .await
        .unwrap();
    assert_eq!(obs.outcome, Outcome::Hit);
    assert_eq!(obs.data, json!({"id": "one"}));
}

#[tokio::test]
async fn test_keys_are_per_method_and_endpoint() {
    let cache = ShapeCache::new();

    cache.observe("GET", "/a", json!({"x": 1})).await.unwrap();
    cache.observe("POST", "/a", json!({"x": 2})).await.unwrap();
    cache.observe("get", "/b", json!({"x": 3})).await.unwrap();

    let keys: Vec<String> = cache
        .keys()
        .await
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(keys, vec!["GET /a", "GET /b", "POST /a"]);
    assert_eq!(cache.len().await, 3);

    assert_eq!(cache.get("post", "/a").await.unwrap().data, json!({"x": 2}));
}

#[tokio::test]
async fn test_array_bodies() {
    let cache = ShapeCache::new();

    cache
        .observe("GET", "/list", json!([{"id": 1}, {"id": 2}]))
        .await
        .unwrap();
    let obs = cache.observe("GET", "/list", json!([])).await.unwrap();
    assert_eq!(obs.outcome, Outcome::Hit);

    let obs = cache
        .observe("GET", "/list", json!({"id": 1}))
        .await
        .unwrap();
    assert_eq!(obs.outcome, Outcome::Replaced);
}

#[tokio::test]
async fn test_inference_error_keeps_existing_entry() {
    let cache = ShapeCache::with_inferrer(SchemaInferrer::new().with_max_depth(2));

    cache
        .observe("GET", "/deep", json!({"a": 1}))
        .await
        .unwrap();
    let err = cache
        .observe("GET", "/deep", json!({"a": {"b": {"c": 1}}}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DepthLimitExceeded { .. }));
    assert_eq!(
        cache.get("GET", "/deep").await.unwrap().data,
        json!({"a": 1})
    );
}

#[tokio::test]
async fn test_failed_first_inference_stores_nothing() {
    let cache = ShapeCache::with_inferrer(SchemaInferrer::new().with_max_depth(1));

    assert!(cache
        .observe("GET", "/deep", json!({"a": {"b": 1}}))
        .await
        .is_err());

    assert!(cache.get("GET", "/deep").await.is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_clear() {
    let cache = ShapeCache::new();
    cache.observe("GET", "/a", json!({})).await.unwrap();

    cache.clear().await;

    assert!(cache.is_empty().await);
    let obs = cache.observe("GET", "/a", json!({})).await.unwrap();
    assert_eq!(obs.outcome, Outcome::Miss);
}

/// Validator that fails to compile every schema
struct BrokenValidator;

impl ShapeValidator for BrokenValidator {
    fn conforms(&self, _schema: &JsonSchema, _data: &Value) -> Result<bool> {
        Err(Error::invalid_schema("unusable"))
    }
}

#[tokio::test]
async fn test_unusable_schema_is_replaced() {
    let cache = ShapeCache::with_parts(SchemaInferrer::new(), Arc::new(BrokenValidator));

    cache.observe("GET", "/a", json!({"v": 1})).await.unwrap();
    let obs = cache.observe("GET", "/a", json!({"v": 2})).await.unwrap();

    assert_eq!(obs.outcome, Outcome::Replaced);
    assert_eq!(obs.data, json!({"v": 2}));
}

/// Validator that records how many checks run at the same time
struct ProbeValidator {
    inner: JsonSchemaValidator,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ShapeValidator for ProbeValidator {
    fn conforms(&self, schema: &JsonSchema, data: &Value) -> Result<bool> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(2));
        let result = self.inner.conforms(schema, data);
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_key_updates_are_serialized() {
    let probe = Arc::new(ProbeValidator {
        inner: JsonSchemaValidator::new(),
        active: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let cache = Arc::new(ShapeCache::with_parts(
        SchemaInferrer::new(),
        Arc::clone(&probe) as Arc<dyn ShapeValidator>,
    ));

    let mut handles = Vec::new();
    for i in 0..32 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            let data = if i % 2 == 0 {
                json!({"v": i})
            } else {
                json!({"v": i.to_string()})
            };
            cache.observe("GET", "/race", data).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap().unwrap().outcome);
    }

    assert_eq!(probe.peak.load(Ordering::SeqCst), 1);
    assert_eq!(
        outcomes.iter().filter(|o| **o == Outcome::Miss).count(),
        1
    );

    // Whatever won last, the stored pair is self-consistent
    let entry = cache.get("GET", "/race").await.unwrap();
    assert!(JsonSchemaValidator::new()
        .conforms(&entry.schema, &entry.data)
        .unwrap());
}
