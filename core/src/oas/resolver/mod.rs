#![deny(missing_docs)]

//! # Schema Resolver
//!
//! Turns schema nodes into [`ResolvedType`]s.
//!
//! Resolution is pure with respect to the run: it never touches the registry or the
//! pending queue. Anything that needs its own named type (inline objects, enum-valued
//! properties, `oneOf` groups) is reported back in [`Discovered`], and the caller
//! commits it only when the whole schema resolved successfully.

pub mod types;

use crate::error::AppResult;
use crate::oas::models::{EnumType, Field, Primitive, RecordType, ResolvedType};
use crate::oas::naming::{title_case, to_snake_ident, ClassNameCache, SELF_COLLISION_SUFFIX};
use crate::oas::registry::{PendingSchema, UnionGroup};
use crate::oas::schema::{SchemaNode, SchemaShape};
use serde_json::Value;
use std::collections::HashSet;
use tracing::trace;

pub use types::map_primitive;

/// Suffix of a union marker name.
pub const UNION_SUFFIX: &str = "OneOf";

/// Suffix of a type generated from inline array items.
pub const ITEM_SUFFIX: &str = "Item";

/// Auxiliary work found while resolving one schema.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Discovered {
    /// Schemas needing their own named type.
    pub pending: Vec<PendingSchema>,
    /// `oneOf` groups needing a marker, variants and a plan.
    pub unions: Vec<UnionGroup>,
}

impl Discovered {
    /// Whether nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.unions.is_empty()
    }

    /// Moves everything from `other` into `self`.
    pub fn absorb(&mut self, other: Discovered) {
        self.pending.extend(other.pending);
        self.unions.extend(other.unions);
    }
}

/// A resolved type plus the work it uncovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The resolved type.
    pub ty: ResolvedType,
    /// Work to commit if the caller accepts `ty`.
    pub discovered: Discovered,
}

/// Resolution context for one generation run.
#[derive(Debug, Default)]
pub struct Resolver {
    names: ClassNameCache,
}

impl Resolver {
    /// Creates a resolver with an empty name cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized class name for a raw key.
    pub fn class_name(&mut self, key: Option<&str>) -> String {
        self.names.class_name(key)
    }

    /// The name cache, for namespace derivation.
    pub fn names_mut(&mut self) -> &mut ClassNameCache {
        &mut self.names
    }

    /// `TitleCase(sanitize(owner)) + "OneOf"`.
    pub fn union_base_name(&mut self, owner: &str) -> String {
        format!("{}{}", self.class_name(Some(owner)), UNION_SUFFIX)
    }

    /// Resolves a schema under `raw_key`, dispatching on its shape.
    ///
    /// Objects (and untyped nodes) become records named after the key, enums become
    /// enums, everything else resolves to the type a property of that shape would get.
    pub fn resolve(
        &mut self,
        raw_key: &str,
        node: &SchemaNode,
        namespace: &str,
    ) -> AppResult<Resolved> {
        match &node.shape {
            SchemaShape::Object { .. } | SchemaShape::Untyped => {
                let name = self.class_name(Some(raw_key));
                self.resolve_record(&name, node, namespace)
            }
            SchemaShape::Enum(_) => {
                let name = self.class_name(Some(raw_key));
                Ok(Resolved {
                    ty: ResolvedType::Enum(self.resolve_enum(&name, node, namespace)),
                    discovered: Discovered::default(),
                })
            }
            _ => {
                let mut discovered = Discovered::default();
                let ty = self.resolve_property(raw_key, node, &mut discovered)?;
                Ok(Resolved { ty, discovered })
            }
        }
    }

    /// Resolves `node` as a record called `name`.
    pub fn resolve_record(
        &mut self,
        name: &str,
        node: &SchemaNode,
        namespace: &str,
    ) -> AppResult<Resolved> {
        let mut discovered = Discovered::default();
        let fields = self.resolve_fields(name, node, &mut discovered)?;
        Ok(Resolved {
            ty: ResolvedType::Record(RecordType {
                name: name.to_string(),
                namespace: namespace.to_string(),
                fields,
                description: node.meta.description.clone(),
                deprecated: node.meta.deprecated,
            }),
            discovered,
        })
    }

    /// Builds an enum type from an enum-shaped node. `null` entries are dropped.
    pub fn resolve_enum(&mut self, name: &str, node: &SchemaNode, namespace: &str) -> EnumType {
        let values = match &node.shape {
            SchemaShape::Enum(values) => values
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        EnumType {
            name: name.to_string(),
            namespace: namespace.to_string(),
            values,
            description: node.meta.description.clone(),
        }
    }

    /// Resolves every property of `node` into a field of the type `owner`.
    pub fn resolve_fields(
        &mut self,
        owner: &str,
        node: &SchemaNode,
        discovered: &mut Discovered,
    ) -> AppResult<Vec<Field>> {
        let Some(properties) = node.properties() else {
            return Ok(Vec::new());
        };

        let mut used_idents = HashSet::new();
        let mut fields = Vec::with_capacity(properties.len());

        for (wire_name, property) in properties {
            let ty = self.resolve_property(wire_name, property, discovered)?;

            let mut base = field_name(wire_name);
            if base == owner {
                base.push_str(SELF_COLLISION_SUFFIX);
            }
            let mut name = base.clone();
            let mut counter = 2;
            while !used_idents.insert(to_snake_ident(&name)) {
                name = format!("{}{}", base, counter);
                counter += 1;
            }

            fields.push(Field {
                name,
                wire_name: wire_name.clone(),
                ty,
                required: node.is_required(wire_name),
                nullable: property.meta.nullable,
                deprecated: property.meta.deprecated,
                description: property.meta.description.clone(),
                default: property.meta.default.clone(),
                boxed: false,
            });
        }

        Ok(fields)
    }

    /// Resolves the type of a property called `key`.
    pub fn resolve_property(
        &mut self,
        key: &str,
        node: &SchemaNode,
        discovered: &mut Discovered,
    ) -> AppResult<ResolvedType> {
        match &node.shape {
            SchemaShape::Reference(target) => {
                Ok(ResolvedType::Reference(self.class_name(Some(target))))
            }
            SchemaShape::Enum(_) => {
                let name = self.class_name(Some(key));
                self.enqueue(key, node, discovered);
                Ok(ResolvedType::Reference(name))
            }
            SchemaShape::OneOf(variants) => Ok(ResolvedType::Reference(
                self.enqueue_union(key, variants, discovered),
            )),
            SchemaShape::Array(None) => Ok(ResolvedType::Array(Box::new(
                ResolvedType::Primitive(Primitive::Untyped),
            ))),
            SchemaShape::Array(Some(items)) => {
                let element = match &items.shape {
                    SchemaShape::OneOf(variants) => {
                        ResolvedType::Reference(self.enqueue_union(key, variants, discovered))
                    }
                    _ if items.is_inline_object() => {
                        let name = format!("{}{}", self.class_name(Some(key)), ITEM_SUFFIX);
                        self.enqueue(&name, items, discovered);
                        ResolvedType::Reference(name)
                    }
                    _ => self.resolve_property(key, items, discovered)?,
                };
                Ok(ResolvedType::Array(Box::new(element)))
            }
            SchemaShape::Object { .. } if node.is_inline_object() => {
                let name = self.class_name(Some(key));
                self.enqueue(key, node, discovered);
                Ok(ResolvedType::Reference(name))
            }
            SchemaShape::Object { .. } | SchemaShape::Untyped => {
                Ok(ResolvedType::Primitive(Primitive::Untyped))
            }
            SchemaShape::Primitive { kind, format } => Ok(ResolvedType::Primitive(
                map_primitive(kind, format.as_deref(), key)?,
            )),
        }
    }

    fn enqueue(&mut self, key: &str, node: &SchemaNode, discovered: &mut Discovered) {
        trace!(key, "deferring inline schema");
        discovered.pending.push(PendingSchema {
            key: key.to_string(),
            schema: node.clone(),
        });
    }

    fn enqueue_union(
        &mut self,
        owner: &str,
        variants: &[SchemaNode],
        discovered: &mut Discovered,
    ) -> String {
        trace!(owner, variants = variants.len(), "deferring oneOf group");
        discovered.unions.push(UnionGroup {
            owner: owner.to_string(),
            variants: variants.to_vec(),
        });
        self.union_base_name(owner)
    }
}

/// In-code field identifier: the wire name title cased, punctuation as boundaries.
fn field_name(wire_name: &str) -> String {
    let spaced: String = wire_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let name = title_case(&spaced);
    if name.is_empty() {
        "Value".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "TestApiClientV1.Models";

    fn node(yaml: &str) -> SchemaNode {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn record(resolved: &Resolved) -> &RecordType {
        match &resolved.ty {
            ResolvedType::Record(r) => r,
            other => panic!("expected record, got {:?}", other),
        }
    }

    #[test]
    fn test_record_fields_and_flags() {
        let schema = node(
            r#"
type: object
required: [a, b]
properties:
  a: { type: string }
  b: { type: string, nullable: true }
  c: { type: string }
  d: { type: string, nullable: true, deprecated: true }
"#,
        );
        let mut resolver = Resolver::new();
        let resolved = resolver.resolve("Flags", &schema, NS).unwrap();
        let rec = record(&resolved);
        assert_eq!(rec.name, "Flags");
        let flags: Vec<(bool, bool)> = rec.fields.iter().map(|f| (f.required, f.nullable)).collect();
        assert_eq!(flags, [(true, false), (true, true), (false, false), (false, true)]);
        assert!(rec.fields[3].deprecated);
        assert!(resolved.discovered.is_empty());
    }

    #[test]
    fn test_self_collision_gets_suffix() {
        let schema = node("properties:\n  user: { type: string }\n  name: { type: string }\n");
        let mut resolver = Resolver::new();
        let resolved = resolver.resolve("User", &schema, NS).unwrap();
        let names: Vec<&str> = record(&resolved).fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["UserProperty", "Name"]);
    }

    #[test]
    fn test_colliding_idents_are_numbered() {
        let schema = node("properties:\n  user_name: { type: string }\n  userName: { type: string }\n");
        let mut resolver = Resolver::new();
        let resolved = resolver.resolve("Account", &schema, NS).unwrap();
        let idents: Vec<String> = record(&resolved).fields.iter().map(Field::ident).collect();
        assert_eq!(idents, ["user_name", "user_name2"]);
    }

    #[test]
    fn test_array_items() {
        let mut resolver = Resolver::new();
        let mut discovered = Discovered::default();
        let typed = node("type: array\nitems: { type: integer, format: int32 }\n");
        assert_eq!(
            resolver.resolve_property("ids", &typed, &mut discovered).unwrap(),
            ResolvedType::Array(Box::new(ResolvedType::Primitive(Primitive::Int32)))
        );
        let bare = node("type: array\n");
        assert_eq!(
            resolver.resolve_property("any", &bare, &mut discovered).unwrap(),
            ResolvedType::Array(Box::new(ResolvedType::Primitive(Primitive::Untyped)))
        );
        assert!(discovered.is_empty());
    }

    #[test]
    fn test_inline_objects_are_deferred() {
        let schema = node(
            r#"
type: object
properties:
  address:
    type: object
    properties:
      street: { type: string }
  tags:
    type: array
    items:
      type: object
      properties:
        label: { type: string }
  status:
    type: string
    enum: [active, blocked]
  extra:
    type: object
"#,
        );
        let mut resolver = Resolver::new();
        let resolved = resolver.resolve("Person", &schema, NS).unwrap();
        let types: Vec<String> = record(&resolved).fields.iter().map(Field::rust_type).collect();
        assert_eq!(
            types,
            [
                "Option<Address>",
                "Option<Vec<TagsItem>>",
                "Option<Status>",
                "Option<serde_json::Value>"
            ]
        );
        let keys: Vec<&str> = resolved.discovered.pending.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["address", "TagsItem", "status"]);
    }

    #[test]
    fn test_one_of_property_becomes_union_reference() {
        let schema = node(
            r#"
type: object
properties:
  choice:
    type: array
    items:
      oneOf:
        - { title: A, properties: { x: { type: integer } } }
        - { title: B, properties: { y: { type: integer } } }
"#,
        );
        let mut resolver = Resolver::new();
        let resolved = resolver.resolve("Question", &schema, NS).unwrap();
        assert_eq!(record(&resolved).fields[0].ty.rust_type(), "Vec<ChoiceOneOf>");
        assert_eq!(resolved.discovered.unions.len(), 1);
        assert_eq!(resolved.discovered.unions[0].owner, "choice");
        assert_eq!(resolved.discovered.unions[0].variants.len(), 2);
    }

    #[test]
    fn test_reference_resolves_to_name_only() {
        let schema = node("properties:\n  parent: { $ref: '#/components/schemas/Node' }\n");
        let mut resolver = Resolver::new();
        let resolved = resolver.resolve("Node", &schema, NS).unwrap();
        assert_eq!(
            record(&resolved).fields[0].ty,
            ResolvedType::Reference("Node".into())
        );
        assert!(resolved.discovered.is_empty());
    }

    #[test]
    fn test_unsupported_property_fails_whole_schema() {
        let schema = node("properties:\n  mail: { type: string, format: email }\n");
        let mut resolver = Resolver::new();
        assert!(resolver.resolve("Contact", &schema, NS).is_err());
    }

    #[test]
    fn test_enum_values_keep_order() {
        let schema = node("type: integer\nenum: [3, 1, 2]\n");
        let mut resolver = Resolver::new();
        match resolver.resolve("Level", &schema, NS).unwrap().ty {
            ResolvedType::Enum(e) => assert_eq!(e.values, ["3", "1", "2"]),
            other => panic!("expected enum, got {:?}", other),
        }
    }
}
