#![deny(missing_docs)]

//! # Deserialization Plan
//!
//! Structural, discriminator-free decoding of a `oneOf` value.
//!
//! Each variant contributes a static table of `(in-code name, wire name)` pairs. While
//! the object's entries stream through a serde [`MapAccess`], the first depth-0 key
//! found in a variant's table selects that variant (declaration order, first match
//! wins). Every entry is held until the object closes, then mapped onto the selected
//! variant's fields. Nested arrays and objects are consumed as whole values, so only
//! depth-0 keys take part in selection.
//!
//! Encoding is never supported.

use crate::error::{AppError, AppResult};
use crate::oas::models::UnionVariant;
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;

/// One field of a variant as seen by the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    /// In-code identifier (without raw prefix).
    pub name: String,
    /// Wire name.
    pub wire: String,
}

/// The field table of one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFields {
    /// Variant type name.
    pub type_name: String,
    /// Fields in declared order.
    pub fields: Vec<FieldKey>,
}

impl VariantFields {
    /// Whether `key` names one of the variant's fields.
    pub fn matches(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.name == key || f.wire == key)
    }

    /// The wire name a held key maps to: exact in-code name first, then wire alias.
    pub fn wire_for(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == key)
            .or_else(|| self.fields.iter().find(|f| f.wire == key))
            .map(|f| f.wire.as_str())
    }
}

/// A decoded union value: the selected variant and its fields keyed by wire name.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedVariant {
    /// Selected variant type name.
    pub variant: String,
    /// Held values, re-keyed by wire name.
    pub fields: Map<String, Value>,
}

impl DecodedVariant {
    /// Deserializes the held fields into a concrete variant type.
    pub fn into_typed<T: de::DeserializeOwned>(self) -> AppResult<T> {
        Ok(serde_json::from_value(Value::Object(self.fields))?)
    }
}

/// The decoder of one union group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializationPlan {
    union: String,
    variants: Vec<VariantFields>,
}

/// What the visitor saw before any variant-specific checks.
#[derive(Debug)]
struct RawUnion {
    selected: Option<usize>,
    held: Vec<(String, Value)>,
}

impl DeserializationPlan {
    /// Builds a plan from a marker name and variant tables.
    pub fn new(union: &str, variants: Vec<VariantFields>) -> Self {
        Self {
            union: union.to_string(),
            variants,
        }
    }

    /// Builds the plan of a derived union group.
    pub fn from_variants(union: &str, variants: &[UnionVariant]) -> Self {
        let tables = variants
            .iter()
            .map(|v| VariantFields {
                type_name: v.name.clone(),
                fields: v
                    .fields
                    .iter()
                    .map(|f| FieldKey {
                        name: f.plain_ident(),
                        wire: f.wire_name.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self::new(union, tables)
    }

    /// The marker name.
    pub fn union_name(&self) -> &str {
        &self.union
    }

    /// Variant tables in declaration order.
    pub fn variants(&self) -> &[VariantFields] {
        &self.variants
    }

    /// First variant whose table contains `key`.
    pub fn select(&self, key: &str) -> Option<&VariantFields> {
        self.select_index(key).map(|i| &self.variants[i])
    }

    fn select_index(&self, key: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.matches(key))
    }

    /// Decodes one union object from JSON text.
    pub fn decode_str(&self, json: &str) -> AppResult<DecodedVariant> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let raw = UnionSeed(self).deserialize(&mut deserializer)?;
        deserializer.end()?;
        self.finish(raw)
    }

    /// Decodes one union object from an already parsed value.
    pub fn decode_value(&self, value: Value) -> AppResult<DecodedVariant> {
        let raw = UnionSeed(self).deserialize(value)?;
        self.finish(raw)
    }

    /// Decodes a JSON array whose elements are union objects.
    pub fn decode_array_str(&self, json: &str) -> AppResult<Vec<DecodedVariant>> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let raws = ArraySeed(self).deserialize(&mut deserializer)?;
        deserializer.end()?;
        raws.into_iter().map(|raw| self.finish(raw)).collect()
    }

    /// Union values cannot be written back to the wire.
    pub fn encode(&self, value: &DecodedVariant) -> AppResult<String> {
        Err(AppError::NotSupported(format!(
            "serializing '{}' (variant '{}') is not supported",
            self.union, value.variant
        )))
    }

    fn finish(&self, raw: RawUnion) -> AppResult<DecodedVariant> {
        let index = raw.selected.ok_or_else(|| AppError::AmbiguousUnion {
            union: self.union.clone(),
        })?;
        let variant = &self.variants[index];

        let mut fields = Map::new();
        for (key, value) in raw.held {
            let wire = variant
                .wire_for(&key)
                .ok_or_else(|| AppError::UnknownUnionField {
                    union: self.union.clone(),
                    variant: variant.type_name.clone(),
                    field: key.clone(),
                })?;
            fields.insert(wire.to_string(), value);
        }

        Ok(DecodedVariant {
            variant: variant.type_name.clone(),
            fields,
        })
    }
}

/// Streams a single union object.
struct UnionSeed<'a>(&'a DeserializationPlan);

impl<'de> DeserializeSeed<'de> for UnionSeed<'_> {
    type Value = RawUnion;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for UnionSeed<'_> {
    type Value = RawUnion;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object matching one variant of {}", self.0.union)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut selected = None;
        let mut held = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value::<Value>()?;
            if selected.is_none() {
                selected = self.0.select_index(&key);
            }
            held.push((key, value));
        }
        Ok(RawUnion { selected, held })
    }
}

/// Streams an array of union objects.
struct ArraySeed<'a>(&'a DeserializationPlan);

impl<'de> DeserializeSeed<'de> for ArraySeed<'_> {
    type Value = Vec<RawUnion>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ArraySeed<'_> {
    type Value = Vec<RawUnion>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an array of {} values", self.0.union)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(raw) = seq.next_element_seed(UnionSeed(self.0))? {
            items.push(raw);
        }
        Ok(items)
    }
}
