#![deny(missing_docs)]

//! # Schema Nodes
//!
//! The closed schema model the resolver works on.
//!
//! A raw [`ShimSchema`] has a dozen optional fields that may or may not be set together.
//! Conversion decides once which one is active, with the priority
//! `$ref` > non-empty `enum` > non-empty `oneOf` > `type`, and stores the answer as a
//! [`SchemaShape`]. Everything downstream matches on the shape instead of probing fields.

use crate::oas::shims::{ShimSchema, ShimType};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Metadata shared by every schema shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaMeta {
    /// Schema title. Mandatory for `oneOf` variants.
    pub title: Option<String>,
    /// Human readable description.
    pub description: Option<String>,
    /// `nullable: true`, or `null` listed in a 3.1 type array.
    pub nullable: bool,
    /// `deprecated: true`.
    pub deprecated: bool,
    /// Declared default value.
    pub default: Option<Value>,
}

/// The active discriminant of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaShape {
    /// `$ref` pointer, e.g. `#/components/schemas/User`.
    Reference(String),
    /// Enumerated values in declared order.
    Enum(Vec<Value>),
    /// `oneOf` variants in declared order.
    OneOf(Vec<SchemaNode>),
    /// `type: array`, with optional `items`.
    Array(Option<Box<SchemaNode>>),
    /// `type: object`, or no `type` but declared properties.
    Object {
        /// Properties in declared order.
        properties: IndexMap<String, SchemaNode>,
        /// Names listed in `required`.
        required: Vec<String>,
    },
    /// No `type` and no properties.
    Untyped,
    /// Any other `type` string, recognized or not.
    Primitive {
        /// The `type` value.
        kind: String,
        /// The `format` value.
        format: Option<String>,
    },
}

/// A schema with its shape decided.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ShimSchema")]
pub struct SchemaNode {
    /// Shared metadata.
    pub meta: SchemaMeta,
    /// Active discriminant.
    pub shape: SchemaShape,
}

impl SchemaNode {
    /// Builds a node from its parts.
    pub fn new(shape: SchemaShape) -> Self {
        Self {
            meta: SchemaMeta::default(),
            shape,
        }
    }

    /// A primitive node, e.g. `SchemaNode::primitive("integer", Some("int64"))`.
    pub fn primitive(kind: &str, format: Option<&str>) -> Self {
        Self::new(SchemaShape::Primitive {
            kind: kind.to_string(),
            format: format.map(str::to_string),
        })
    }

    /// A `$ref` node.
    pub fn reference(target: &str) -> Self {
        Self::new(SchemaShape::Reference(target.to_string()))
    }

    /// Sets the title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.meta.title = Some(title.to_string());
        self
    }

    /// Marks the node nullable.
    pub fn nullable(mut self) -> Self {
        self.meta.nullable = true;
        self
    }

    /// Properties when the node is an object.
    pub fn properties(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match &self.shape {
            SchemaShape::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Whether `name` is listed in the object's `required` set.
    pub fn is_required(&self, name: &str) -> bool {
        match &self.shape {
            SchemaShape::Object { required, .. } => required.iter().any(|r| r == name),
            _ => false,
        }
    }

    /// The `$ref` target, if this node is a reference.
    pub fn reference_target(&self) -> Option<&str> {
        match &self.shape {
            SchemaShape::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Whether the node is an object with at least one inline property.
    pub fn is_inline_object(&self) -> bool {
        matches!(&self.shape, SchemaShape::Object { properties, .. } if !properties.is_empty())
    }

    /// A short label of the shape, used in diagnostics and metadata comments.
    pub fn kind_label(&self) -> &str {
        match &self.shape {
            SchemaShape::Reference(_) => "$ref",
            SchemaShape::Enum(_) => "enum",
            SchemaShape::OneOf(_) => "oneOf",
            SchemaShape::Array(_) => "array",
            SchemaShape::Object { .. } => "object",
            SchemaShape::Untyped => "untyped",
            SchemaShape::Primitive { kind, .. } => kind,
        }
    }
}

impl From<ShimSchema> for SchemaNode {
    fn from(shim: ShimSchema) -> Self {
        let (kind, type_list_nullable) = match shim.schema_type {
            Some(ShimType::Single(t)) => (Some(t), false),
            Some(ShimType::Multiple(types)) => {
                let has_null = types.iter().any(|t| t == "null");
                (types.into_iter().find(|t| t != "null"), has_null)
            }
            None => (None, false),
        };

        let meta = SchemaMeta {
            title: shim.title,
            description: shim.description,
            nullable: shim.nullable.unwrap_or(false) || type_list_nullable,
            deprecated: shim.deprecated.unwrap_or(false),
            default: shim.default,
        };

        let enum_values = shim.enum_values.unwrap_or_default();
        let one_of = shim.one_of.unwrap_or_default();
        let properties: IndexMap<String, SchemaNode> = shim
            .properties
            .unwrap_or_default()
            .into_iter()
            .map(|(name, schema)| (name, SchemaNode::from(schema)))
            .collect();
        let required = shim.required.unwrap_or_default();

        let shape = if let Some(reference) = shim.reference {
            SchemaShape::Reference(reference)
        } else if !enum_values.is_empty() {
            SchemaShape::Enum(enum_values)
        } else if !one_of.is_empty() {
            SchemaShape::OneOf(one_of.into_iter().map(SchemaNode::from).collect())
        } else {
            match kind.as_deref() {
                Some("array") => {
                    SchemaShape::Array(shim.items.map(|items| Box::new(SchemaNode::from(*items))))
                }
                Some("object") => SchemaShape::Object {
                    properties,
                    required,
                },
                None if !properties.is_empty() => SchemaShape::Object {
                    properties,
                    required,
                },
                None => SchemaShape::Untyped,
                Some(other) => SchemaShape::Primitive {
                    kind: other.to_string(),
                    format: shim.format,
                },
            }
        };

        SchemaNode { meta, shape }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> SchemaNode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_reference_wins_over_everything() {
        let n = node(r##"{"$ref": "#/components/schemas/User", "type": "object", "enum": ["a"]}"##);
        assert_eq!(n.reference_target(), Some("#/components/schemas/User"));
    }

    #[test]
    fn test_enum_wins_over_object() {
        let n = node(r#"{"type": "object", "enum": ["a", "b"], "properties": {"x": {"type": "string"}}}"#);
        match n.shape {
            SchemaShape::Enum(values) => assert_eq!(values.len(), 2),
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_implicit_object_and_untyped() {
        let implicit = node(r#"{"properties": {"x": {"type": "integer"}}, "required": ["x"]}"#);
        assert!(implicit.is_inline_object());
        assert!(implicit.is_required("x"));

        let untyped = node(r#"{"description": "anything"}"#);
        assert_eq!(untyped.shape, SchemaShape::Untyped);
        assert_eq!(untyped.meta.description.as_deref(), Some("anything"));
    }

    #[test]
    fn test_type_array_with_null_is_nullable() {
        let n = node(r#"{"type": ["string", "null"], "format": "uuid"}"#);
        assert!(n.meta.nullable);
        assert_eq!(n, SchemaNode::primitive("string", Some("uuid")).nullable());
    }

    #[test]
    fn test_property_order_is_preserved() {
        let n = node(r#"{"type": "object", "properties": {"zeta": {"type": "string"}, "alpha": {"type": "string"}, "mid": {"type": "string"}}}"#);
        let names: Vec<&String> = n.properties().unwrap().keys().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_array_without_items() {
        let n = node(r#"{"type": "array"}"#);
        assert_eq!(n.shape, SchemaShape::Array(None));
        assert_eq!(n.kind_label(), "array");
    }
}
