//! This module implements loading a [`Schema`] from JSON.
//!
//! # Examples
//!
//! ```
//! use ymlcheck::validate_json_schema_str;
//!
//! let schema = r#"{ "children": { "mode": { "kind": "string-one-of", "values": ["on", "off"] } } }"#;
//!
//! let diagnostics = validate_json_schema_str(schema, "mode: on\n").unwrap();
//! assert!(diagnostics.is_empty());
//! ```
//!
//! The accepted keys on each node are `kind` (or `type`), `values` (or
//! `allowedValues`), `children`, `required`, and `allowListValues`.

#![cfg(feature = "serde_json")]

use crate::diagnostic::Diagnostic;
use crate::schema::{Block, Node, Property, Schema};
use crate::util::{SchemaError, SchemaResult};
use crate::validate::validate;
use serde::Deserialize;
use serde_json::Value as JSON_Value;
use std::collections::BTreeMap;
use std::convert::TryFrom;

// The JSON shape of a schema node, before it's checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(alias = "type")]
    kind: Option<String>,
    #[serde(alias = "values")]
    allowed_values: Option<Vec<JSON_Value>>,
    #[serde(default)]
    children: BTreeMap<String, RawNode>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    allow_list_values: bool,
}

fn child_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn convert_block(raw: &RawNode, path: &str) -> SchemaResult<Block> {
    let children: SchemaResult<BTreeMap<String, Property>> = raw
        .children
        .iter()
        .map(|(name, child)| {
            // An iterator returning a 2-tuple can be used as (key, value)
            // when building a new map.
            Ok((name.clone(), convert_property(child, &child_path(path, name))?))
        })
        .collect();
    Ok(Block {
        children: children?,
        allow_list_values: raw.allow_list_values,
    })
}

fn convert_property(raw: &RawNode, path: &str) -> SchemaResult<Property> {
    let kind = raw
        .kind
        .as_deref()
        .ok_or_else(|| SchemaError::MissingKind(path.to_string()))?;
    let node = match kind {
        "string" => Node::String,
        "number" => Node::Number,
        "nested-block" | "block" => Node::Block(convert_block(raw, path)?),
        "string-one-of" => {
            let values = allowed_values(raw, path)?
                .iter()
                .map(|v| match v {
                    JSON_Value::String(s) => Ok(s.clone()),
                    _ => Err(bad_value(path, "string")),
                })
                .collect::<SchemaResult<_>>()?;
            Node::StringOneOf(values)
        }
        "number-one-of" => {
            let values = allowed_values(raw, path)?
                .iter()
                .map(|v| v.as_f64().ok_or_else(|| bad_value(path, "number")))
                .collect::<SchemaResult<_>>()?;
            Node::NumberOneOf(values)
        }
        other => {
            return Err(SchemaError::UnknownKind {
                path: path.to_string(),
                kind: other.to_string(),
            })
        }
    };
    Ok(Property {
        node,
        required: raw.required,
    })
}

fn allowed_values<'a>(raw: &'a RawNode, path: &str) -> SchemaResult<&'a [JSON_Value]> {
    raw.allowed_values
        .as_deref()
        .ok_or_else(|| SchemaError::MissingValues(path.to_string()))
}

fn bad_value(path: &str, expected: &'static str) -> SchemaError {
    SchemaError::BadValue {
        path: path.to_string(),
        expected,
    }
}

// The root is a block without a kind.
impl TryFrom<&JSON_Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: &JSON_Value) -> Result<Self, Self::Error> {
        let raw = RawNode::deserialize(value).map_err(|e| SchemaError::Json(format!("{}", e)))?;
        Ok(Schema::new(convert_block(&raw, "")?))
    }
}

// A variant that consumes the JSON Value.
impl TryFrom<JSON_Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: JSON_Value) -> Result<Self, Self::Error> {
        Schema::try_from(&value)
    }
}

/// Parse a schema from JSON text.
pub fn schema_from_json_str(json: &str) -> SchemaResult<Schema> {
    let json_value: JSON_Value =
        serde_json::from_str(json).map_err(|e| SchemaError::Json(format!("{}", e)))?;
    Schema::try_from(&json_value)
}

/// Validate document text against a JSON-encoded schema.
pub fn validate_json_schema_str(schema: &str, text: &str) -> SchemaResult<Vec<Diagnostic>> {
    let schema = schema_from_json_str(schema)?;
    Ok(validate(&schema, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use serde_json::json;

    #[test]
    fn load_all_kinds() {
        let value = json!({
            "allowListValues": true,
            "children": {
                "a": { "kind": "string" },
                "b": { "type": "number", "required": true },
                "c": { "kind": "string-one-of", "values": ["x", "y"] },
                "d": { "kind": "number-one-of", "allowedValues": [1, 2.5] },
                "e": {
                    "kind": "nested-block",
                    "allowListValues": true,
                    "children": { "f": { "kind": "string" } }
                },
                "g": { "kind": "block" }
            }
        });
        let expected = Schema::new(
            Block::new()
                .allow_list_values(true)
                .with("a", Property::new(string()))
                .with("b", Property::new(number()).required())
                .with("c", Property::new(string_one_of(&["x", "y"])))
                .with("d", Property::new(number_one_of(&[1.0, 2.5])))
                .with(
                    "e",
                    Property::new(block(
                        Block::new()
                            .allow_list_values(true)
                            .with("f", Property::new(string())),
                    )),
                )
                .with("g", Property::new(block(Block::new()))),
        );
        assert_eq!(Schema::try_from(value).unwrap(), expected);
    }

    #[test]
    fn load_errors() {
        let err = schema_from_json_str(r#"{"children": {"a": {"kind": "bool"}}}"#).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownKind {
                path: "a".into(),
                kind: "bool".into()
            }
        );

        let err = schema_from_json_str(
            r#"{"children": {"a": {"kind": "block", "children": {"b": {}}}}}"#,
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::MissingKind("a.b".into()));

        let err = schema_from_json_str(r#"{"children": {"a": {"kind": "number-one-of"}}}"#)
            .unwrap_err();
        assert_eq!(err, SchemaError::MissingValues("a".into()));

        let err = schema_from_json_str(r#"{"children": {"a": {"kind": "string-one-of", "values": [1]}}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::BadValue {
                path: "a".into(),
                expected: "string"
            }
        );

        let err = schema_from_json_str("{").unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn empty_schema() {
        let schema = schema_from_json_str("{}").unwrap();
        assert_eq!(schema, Schema::default());
    }
}
