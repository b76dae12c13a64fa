//! # shape-mock
//!
//! Infers JSON Schemas from live API responses and replays a stored response
//! for as long as new responses keep the same shape.
//!
//! ## Features
//!
//! - **Schema Inference**: Draft-07 schemas from arbitrary JSON values, with
//!   `anyOf` unions for heterogeneous arrays
//! - **Shape Cache**: One stored response per `"METHOD endpoint"`, replayed
//!   while new responses validate against its schema
//! - **Mock Server**: HTTP endpoint plus a service worker that routes browser
//!   `fetch` responses through the cache
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use shape_mock::schema::infer_schema;
//!
//! let schema = infer_schema(&json!({"name": "John", "tags": ["a", 1]})).unwrap();
//! assert_eq!(
//!     schema.to_json()["properties"]["tags"],
//!     json!({"type": "array", "items": {"anyOf": [{"type": "string"}, {"type": "number"}]}})
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! browser fetch ──► mock.js ──► POST /mock ──► ShapeCache::observe
//!                                                  │
//!                          stored schema accepts? ─┼─ yes ─► stored body
//!                                                  └─ no ──► SchemaInferrer ─► store, live body
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Schema inference from JSON data
pub mod schema;

/// Response shape cache
pub mod cache;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use cache::{ShapeCache, ShapeValidator};
pub use error::{Error, Result};
pub use schema::{infer_schema, JsonSchema, JsonType, SchemaInferrer, SchemaNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
