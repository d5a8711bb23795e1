//! Generated from `TestApiClientV1.Models`.
#![allow(unused_imports)]

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use super::*;

/// `(variant, [(field, wire name)])` for every variant of [`ChoiceOneOf`], in declaration order.
const CHOICE_ONE_OF_VARIANTS: &[(&str, &[(&str, &str)])] = &[
    ("choiceA", &[("x", "x")]),
    ("choiceB", &[("y", "y")]),
];

impl<'de> Deserialize<'de> for ChoiceOneOf {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PlanVisitor;

        impl<'de> Visitor<'de> for PlanVisitor {
            type Value = ChoiceOneOf;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object matching one variant of ChoiceOneOf")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut selected: Option<usize> = None;
                let mut held: Vec<(String, serde_json::Value)> = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    let value = map.next_value::<serde_json::Value>()?;
                    if selected.is_none() {
                        selected = CHOICE_ONE_OF_VARIANTS.iter().position(|(_, fields)| {
                            fields.iter().any(|(name, wire)| *name == key || *wire == key)
                        });
                    }
                    held.push((key, value));
                }

                let index = selected.ok_or_else(|| {
                    <A::Error as de::Error>::custom(
                        "Could not determine the variant of 'ChoiceOneOf': no property matched any variant",
                    )
                })?;
                let (variant, fields) = CHOICE_ONE_OF_VARIANTS[index];

                let mut object = serde_json::Map::new();
                for (key, value) in held {
                    let wire = fields
                        .iter()
                        .find(|(name, _)| *name == key)
                        .or_else(|| fields.iter().find(|(_, wire)| *wire == key))
                        .map(|(_, wire)| *wire)
                        .ok_or_else(|| {
                            <A::Error as de::Error>::custom(format!(
                                "Property '{}' not found in variant '{}' of 'ChoiceOneOf'",
                                key, variant
                            ))
                        })?;
                    object.insert(wire.to_string(), value);
                }
                let value = serde_json::Value::Object(object);

                match index {
                    0 => serde_json::from_value(value)
                        .map(ChoiceOneOf::choiceA)
                        .map_err(de::Error::custom),
                    1 => serde_json::from_value(value)
                        .map(ChoiceOneOf::choiceB)
                        .map_err(de::Error::custom),
                    _ => Err(de::Error::custom("variant index out of range")),
                }
            }
        }

        deserializer.deserialize_map(PlanVisitor)
    }
}

impl Serialize for ChoiceOneOf {
    fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(ser::Error::custom(
            "Not supported: serializing 'ChoiceOneOf' is not supported",
        ))
    }
}
