//! Schema conformance checking

use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use serde_json::Value;

/// Decides whether data still has the shape described by a stored schema
pub trait ShapeValidator: Send + Sync {
    /// Check `data` against `schema`
    ///
    /// A mismatch is `Ok(false)`; errors are reserved for schemas that cannot
    /// be compiled.
    fn conforms(&self, schema: &JsonSchema, data: &Value) -> Result<bool>;
}

/// Draft-07 validator backed by the `jsonschema` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Check `data` against a raw schema document
    pub fn conforms_raw(&self, schema: &Value, data: &Value) -> Result<bool> {
        let validator = jsonschema::draft7::new(schema)
            .map_err(|e| Error::invalid_schema(e.to_string()))?;
        Ok(validator.is_valid(data))
    }

    /// Describe every violation of `schema` by `data`
    pub fn violations(&self, schema: &Value, data: &Value) -> Result<Vec<String>> {
        let validator = jsonschema::draft7::new(schema)
            .map_err(|e| Error::invalid_schema(e.to_string()))?;
        Ok(validator
            .iter_errors(data)
            .map(|err| err.to_string())
            .collect())
    }
}

impl ShapeValidator for JsonSchemaValidator {
    fn conforms(&self, schema: &JsonSchema, data: &Value) -> Result<bool> {
        self.conforms_raw(&schema.to_json(), data)
    }
}
