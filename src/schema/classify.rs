//! Type classification and value locations

use super::types::JsonType;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

/// Classify a possibly-missing value
///
/// `None` stands for a value that is absent altogether (a field that was never
/// sent), which has no JSON Schema type.
pub fn classify(value: Option<&Value>) -> Result<JsonType> {
    value
        .map(JsonType::of)
        .ok_or_else(|| Error::unclassifiable(Location::Root.to_string()))
}

/// Position of a value inside the document being inferred
///
/// Built on the stack during traversal and only rendered when an error
/// needs to report where it happened.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Location<'a> {
    Root,
    Key(&'a Location<'a>, &'a str),
    Index(&'a Location<'a>, usize),
}

impl Location<'_> {
    pub(crate) fn key<'a>(&'a self, key: &'a str) -> Location<'a> {
        Location::Key(self, key)
    }

    pub(crate) fn index(&self, index: usize) -> Location<'_> {
        Location::Index(self, index)
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Root => write!(f, "$"),
            Location::Key(parent, key) => write!(f, "{parent}.{key}"),
            Location::Index(parent, index) => write!(f, "{parent}[{index}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!("text"), JsonType::String ; "string")]
    #[test_case(json!(30), JsonType::Number ; "integer literal")]
    #[test_case(json!(-4.5), JsonType::Number ; "float literal")]
    #[test_case(json!(true), JsonType::Boolean ; "boolean")]
    #[test_case(json!(null), JsonType::Null ; "null")]
    #[test_case(json!([1, 2]), JsonType::Array ; "array")]
    #[test_case(json!([]), JsonType::Array ; "empty array")]
    #[test_case(json!({"a": 1}), JsonType::Object ; "object")]
    #[test_case(json!({}), JsonType::Object ; "empty object")]
    fn test_classify(value: Value, expected: JsonType) {
        assert_eq!(classify(Some(&value)).unwrap(), expected);
    }

    #[test]
    fn test_classify_never_reports_integer() {
        for value in [json!(0), json!(u64::MAX), json!(i64::MIN), json!(1.0)] {
            assert_ne!(JsonType::of(&value), JsonType::Integer);
        }
    }

    #[test]
    fn test_classify_missing_value() {
        let err = classify(None).unwrap_err();
        assert!(matches!(err, Error::UnclassifiableType { .. }));
    }

    #[test]
    fn test_location_display() {
        let root = Location::Root;
        let users = root.key("users");
        let first = users.index(0);
        let name = first.key("name");
        assert_eq!(name.to_string(), "$.users[0].name");
        assert_eq!(root.to_string(), "$");
    }
}
