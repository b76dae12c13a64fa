//! Cache types

use crate::schema::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Cache key in the form `"<METHOD> <endpoint>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a request method and endpoint; the method is upper-cased
    pub fn new(method: &str, endpoint: &str) -> Self {
        Self(format!("{} {}", method.to_uppercase(), endpoint))
    }

    /// Key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored response body together with the schema inferred from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Value,
    pub schema: JsonSchema,
}

/// What happened to the cache during an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The stored schema accepted the new data; the stored data was returned
    Hit,
    /// Nothing was stored for the key; the new data was inferred and stored
    Miss,
    /// The stored schema rejected the new data; the entry was overwritten
    Replaced,
}

impl Outcome {
    /// Lowercase name used in logs and response headers
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Miss => "miss",
            Outcome::Replaced => "replaced",
        }
    }
}

/// Result of observing one response body
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Data to hand back to the caller
    pub data: Value,
    pub outcome: Outcome,
}
