//! Schema inference from JSON values

use super::classify::Location;
use super::types::{JsonSchema, JsonType, Properties, SchemaNode};
use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Default maximum container nesting accepted by the inferrer
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How array-valued object properties are wrapped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NestedArrayItems {
    /// `{type: "array", items: <item schema>}`, the same as top-level arrays
    #[default]
    Single,
    /// `{type: "array", items: {type: "array", items: <item schema>}}`
    ///
    /// Byte-compatible with schemas produced by earlier mock servers. Data
    /// never validates against these nodes, so every observation of such an
    /// endpoint re-infers.
    Legacy,
}

/// Inference options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Maximum container nesting before inference is refused
    pub max_depth: usize,
    /// Wrapping policy for array-valued object properties
    pub nested_array_items: NestedArrayItems,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            nested_array_items: NestedArrayItems::Single,
        }
    }
}

/// Schema inferrer with configuration options
///
/// Inference is a pure function of its input: the inferrer holds only
/// options and can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    options: InferenceOptions,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inferrer from explicit options
    pub fn with_options(options: InferenceOptions) -> Self {
        Self { options }
    }

    /// Set maximum depth for nested containers
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    /// Set the wrapping policy for array-valued properties
    #[must_use]
    pub fn with_nested_array_items(mut self, policy: NestedArrayItems) -> Self {
        self.options.nested_array_items = policy;
        self
    }

    /// Current options
    pub fn options(&self) -> InferenceOptions {
        self.options
    }

    /// Infer a schema document from a JSON value
    ///
    /// Arrays produce an array document; every other root is inferred with the
    /// object algorithm, so scalar roots yield an object document without
    /// properties.
    pub fn infer(&self, root: &Value) -> Result<JsonSchema> {
        let loc = Location::Root;
        match root {
            Value::Array(items) => {
                self.enter(1, &loc)?;
                Ok(JsonSchema::array(self.array_items(items, &loc, 1)?))
            }
            Value::Object(map) => {
                self.enter(1, &loc)?;
                Ok(JsonSchema::object(self.object_properties(map, &loc, 1)?))
            }
            _ => Ok(JsonSchema::object(Properties::new())),
        }
    }

    /// Infer the property schemas of an object, in key order
    pub fn infer_object(&self, map: &Map<String, Value>) -> Result<Properties> {
        let loc = Location::Root;
        self.enter(1, &loc)?;
        self.object_properties(map, &loc, 1)
    }

    /// Infer the item schema of an array's elements
    pub fn infer_array_items(&self, items: &[Value]) -> Result<SchemaNode> {
        let loc = Location::Root;
        self.enter(1, &loc)?;
        self.array_items(items, &loc, 1)
    }

    fn enter(&self, depth: usize, loc: &Location<'_>) -> Result<()> {
        if depth > self.options.max_depth {
            return Err(Error::depth_exceeded(self.options.max_depth, loc.to_string()));
        }
        Ok(())
    }

    /// `depth` is the nesting level of `map` itself
    fn object_properties(
        &self,
        map: &Map<String, Value>,
        loc: &Location<'_>,
        depth: usize,
    ) -> Result<Properties> {
        let mut properties = Properties::with_capacity(map.len());

        for (key, value) in map {
            let child = loc.key(key);
            let node = match value {
                Value::Array(items) => {
                    let items = self.array_node(items, &child, depth + 1)?;
                    match self.options.nested_array_items {
                        NestedArrayItems::Single => items,
                        NestedArrayItems::Legacy => SchemaNode::array(items),
                    }
                }
                _ => self.value_node(value, &child, depth + 1)?,
            };
            properties.insert(key.clone(), node);
        }

        Ok(properties)
    }

    /// Item schema for a sequence of elements
    ///
    /// Element shapes are deduplicated by structural equality in first-seen
    /// order. No elements gives `{type: "null"}`, one distinct shape is
    /// returned as is, several become an `anyOf` union.
    fn array_items(
        &self,
        items: &[Value],
        loc: &Location<'_>,
        depth: usize,
    ) -> Result<SchemaNode> {
        let mut distinct: Vec<SchemaNode> = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let node = self.value_node(item, &loc.index(index), depth + 1)?;
            if !distinct.contains(&node) {
                distinct.push(node);
            }
        }

        Ok(match distinct.len() {
            0 => SchemaNode::primitive(JsonType::Null),
            1 => distinct.swap_remove(0),
            _ => SchemaNode::any_of(distinct),
        })
    }

    fn array_node(&self, items: &[Value], loc: &Location<'_>, depth: usize) -> Result<SchemaNode> {
        self.enter(depth, loc)?;
        Ok(SchemaNode::array(self.array_items(items, loc, depth)?))
    }

    /// Schema node for a value at nesting level `depth`
    fn value_node(&self, value: &Value, loc: &Location<'_>, depth: usize) -> Result<SchemaNode> {
        match value {
            Value::Object(map) => {
                self.enter(depth, loc)?;
                Ok(SchemaNode::object(self.object_properties(map, loc, depth)?))
            }
            Value::Array(items) => self.array_node(items, loc, depth),
            other => Ok(SchemaNode::primitive(JsonType::of(other))),
        }
    }
}

/// Infer a schema document with default options (convenience function)
pub fn infer_schema(value: &Value) -> Result<JsonSchema> {
    SchemaInferrer::new().infer(value)
}

/// Infer the item schema of an array with default options (convenience function)
pub fn infer_array_items(items: &[Value]) -> Result<SchemaNode> {
    SchemaInferrer::new().infer_array_items(items)
}
