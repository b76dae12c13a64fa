//! Schema inference module
//!
//! Infers draft-07 JSON Schemas from JSON values.
//!
//! # Features
//!
//! - **Type Classification**: Maps every JSON value to its schema type
//! - **Nested Object Support**: Handles nested objects recursively, keeping key order
//! - **Array Unions**: Deduplicates element shapes and unions the distinct ones with `anyOf`
//! - **Depth Limiting**: Refuses input nested deeper than a configured limit

mod classify;
mod inference;
mod types;

pub use classify::classify;
pub use inference::{
    infer_array_items, infer_schema, InferenceOptions, NestedArrayItems, SchemaInferrer,
    DEFAULT_MAX_DEPTH,
};
pub use types::{JsonSchema, JsonType, Properties, SchemaNode, DRAFT_07};
