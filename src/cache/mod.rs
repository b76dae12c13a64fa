//! Response shape cache
//!
//! Remembers one response body and its inferred schema per `"METHOD endpoint"`
//! key, and replays the stored body for as long as new bodies keep the same
//! shape.
//!
//! # Flow
//!
//! 1. Look up the key
//! 2. If a schema is stored and the new body conforms, return the stored body
//! 3. Otherwise infer a schema for the new body, store both, return the new body

mod store;
mod types;
mod validator;

pub use store::ShapeCache;
pub use types::{CacheEntry, CacheKey, Observation, Outcome};
pub use validator::{JsonSchemaValidator, ShapeValidator};

#[cfg(test)]
mod tests;
