#![deny(missing_docs)]

//! # Document Shims
//!
//! Generic structures acting as an Intermediate Deserialization Layer.
//! These structs map directly to OpenAPI JSON/YAML objects and keep every field
//! optional; `OpenApiDocument::try_from` and `SchemaNode::from` turn them into the
//! strict model.

use crate::oas::document::{Components, PathItem};
use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Root object exactly as written in the document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimOpenApi {
    /// The `openapi` version marker (e.g. "3.0.1").
    #[serde(default, deserialize_with = "lenient_string")]
    pub openapi: Option<String>,
    /// The `info` block.
    pub info: Option<ShimInfo>,
    /// URL templates mapped to path items.
    #[serde(default)]
    pub paths: ShimPaths,
    /// Reusable components.
    pub components: Option<Components>,
}

/// The `info` block exactly as written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShimInfo {
    /// API title.
    pub title: Option<String>,
    /// Short summary.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// API version. Unquoted YAML numbers (`version: 1.0`) are accepted.
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Represents the Paths Object, dropping specification extensions (`x-...`).
#[derive(Debug, Clone, Default)]
pub struct ShimPaths {
    /// Parsed path items keyed by path template, in document order.
    pub items: IndexMap<String, PathItem>,
}

impl<'de> Deserialize<'de> for ShimPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut items = IndexMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let path_item = serde_json::from_value::<PathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items })
    }
}

/// `type` is either a single string or (OAS 3.1) a list such as `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ShimType {
    /// `type: string`
    Single(String),
    /// `type: [string, "null"]`
    Multiple(Vec<String>),
}

/// A JSON Schema object exactly as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimSchema {
    /// Schema title.
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Example value (unused by generation).
    pub example: Option<Value>,
    /// OAS 3.0 nullable flag.
    pub nullable: Option<bool>,
    /// Default value.
    pub default: Option<Value>,
    /// Deprecation flag.
    pub deprecated: Option<bool>,
    /// Required property names.
    pub required: Option<Vec<String>>,
    /// Type hint.
    #[serde(rename = "type")]
    pub schema_type: Option<ShimType>,
    /// Format hint.
    pub format: Option<String>,
    /// Reference pointer.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Object properties.
    pub properties: Option<IndexMap<String, ShimSchema>>,
    /// Enum values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// Array item schema.
    pub items: Option<Box<ShimSchema>>,
    /// Union variants.
    pub one_of: Option<Vec<ShimSchema>>,
}

/// A response status key. YAML allows bare integers (`200:`), JSON only strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusKey(pub String);

impl<'de> Deserialize<'de> for StatusKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawStatus {
            Code(u64),
            Text(String),
        }

        Ok(match RawStatus::deserialize(deserializer)? {
            RawStatus::Code(code) => StatusKey(code.to_string()),
            RawStatus::Text(text) => StatusKey(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_skip_extensions() {
        let json = r#"{"/users": {"get": {"responses": {}}}, "x-internal": true}"#;
        let paths: ShimPaths = serde_json::from_str(json).unwrap();
        assert_eq!(paths.items.len(), 1);
        assert!(paths.items.contains_key("/users"));
    }

    #[test]
    fn test_status_key_from_yaml_integer() {
        let yaml = "200: ok\n'404': missing\n";
        let map: IndexMap<StatusKey, String> = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<&str> = map.keys().map(|k| k.0.as_str()).collect();
        assert_eq!(keys, ["200", "404"]);
    }

    #[test]
    fn test_numeric_version_is_accepted() {
        let info: ShimInfo = serde_yaml::from_str("title: T\nversion: 2.5\n").unwrap();
        assert_eq!(info.version.as_deref(), Some("2.5"));
    }

    #[test]
    fn test_shim_schema_type_list() {
        let shim: ShimSchema = serde_json::from_str(r#"{"type": ["integer", "null"]}"#).unwrap();
        assert_eq!(
            shim.schema_type,
            Some(ShimType::Multiple(vec!["integer".into(), "null".into()]))
        );
    }
}
