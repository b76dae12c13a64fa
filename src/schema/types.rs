//! Schema types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dialect identifier written at the top of every inferred document
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Object properties in the order their keys were first seen
pub type Properties = IndexMap<String, SchemaNode>;

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    /// Schema vocabulary only; classification reports `Number` for every numeric value
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    /// Type of a parsed JSON value
    ///
    /// Arrays are checked before objects; numbers are never reported as `Integer`.
    pub fn of(value: &Value) -> JsonType {
        match value {
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Bool(_) => JsonType::Boolean,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
            Value::Null => JsonType::Null,
        }
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// One node of an inferred schema
///
/// Exactly one shape is populated:
/// - `{type}` for primitives
/// - `{type: "object", properties}` for objects
/// - `{type: "array", items}` for arrays
/// - `{anyOf}` for the item schema of a heterogeneous array
///
/// Equality is structural; property order does not participate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,
}

impl SchemaNode {
    /// Create a node carrying only a type
    pub fn primitive(json_type: JsonType) -> Self {
        Self {
            json_type: Some(json_type),
            properties: None,
            items: None,
            any_of: None,
        }
    }

    /// Create an object node with nested properties
    pub fn object(properties: Properties) -> Self {
        Self {
            json_type: Some(JsonType::Object),
            properties: Some(properties),
            items: None,
            any_of: None,
        }
    }

    /// Create an array node with an item schema
    pub fn array(items: SchemaNode) -> Self {
        Self {
            json_type: Some(JsonType::Array),
            properties: None,
            items: Some(Box::new(items)),
            any_of: None,
        }
    }

    /// Create a union node
    ///
    /// Callers are responsible for passing at least two distinct members.
    pub fn any_of(members: Vec<SchemaNode>) -> Self {
        Self {
            json_type: None,
            properties: None,
            items: None,
            any_of: Some(members),
        }
    }

    /// Check if this node is a union
    pub fn is_union(&self) -> bool {
        self.any_of.is_some()
    }

    /// Union members, empty for non-union nodes
    pub fn members(&self) -> &[SchemaNode] {
        self.any_of.as_deref().unwrap_or_default()
    }

    /// Get a nested property of an object node
    pub fn get_property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Full JSON Schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema dialect
    #[serde(rename = "$schema")]
    pub schema: String,

    /// Root type, "object" or "array"
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Root properties (object documents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    /// Root item schema (array documents)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
}

impl JsonSchema {
    /// Create an object document
    pub fn object(properties: Properties) -> Self {
        Self {
            schema: DRAFT_07.to_string(),
            json_type: JsonType::Object,
            properties: Some(properties),
            items: None,
        }
    }

    /// Create an array document
    pub fn array(items: SchemaNode) -> Self {
        Self {
            schema: DRAFT_07.to_string(),
            json_type: JsonType::Array,
            properties: None,
            items: Some(Box::new(items)),
        }
    }

    /// Get a root property
    pub fn get_property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
