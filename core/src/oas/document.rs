#![deny(missing_docs)]

//! # OpenAPI Document
//!
//! The validated document handed to the generators. Built from [`ShimOpenApi`], which
//! is where missing top-level fields are detected.

use crate::error::{AppError, AppResult};
use crate::oas::naming::{title_case, ClassNameCache};
use crate::oas::schema::SchemaNode;
use crate::oas::shims::{ShimOpenApi, StatusKey};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Document info with the fields generation depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    /// API title, used for the namespace.
    pub title: String,
    /// API version. Its first character is the version tag.
    pub version: String,
    /// Optional summary.
    pub summary: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

impl Info {
    /// First character of the version, verbatim (`"3.0.1"` -> `"3"`).
    pub fn version_tag(&self) -> String {
        self.version.chars().take(1).collect()
    }

    /// Root namespace of the generated code, e.g. `TestApiClientV1`.
    pub fn namespace(&self, names: &mut ClassNameCache) -> String {
        format!(
            "{}ApiClientV{}",
            title_case(&names.class_name(Some(&self.title))),
            self.version_tag()
        )
    }

    /// Namespace of the generated models, e.g. `TestApiClientV1.Models`.
    pub fn models_namespace(&self, names: &mut ClassNameCache) -> String {
        format!("{}.Models", self.namespace(names))
    }
}

/// Reusable components.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    /// Named schemas in document order.
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaNode>,
}

/// HTTP verbs a path item can carry, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl HttpVerb {
    /// All verbs in emission order.
    pub const ALL: [HttpVerb; 8] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Delete,
        HttpVerb::Patch,
        HttpVerb::Head,
        HttpVerb::Options,
        HttpVerb::Trace,
    ];

    /// Upper case method name, e.g. "GET".
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
            HttpVerb::Trace => "TRACE",
        }
    }

    /// Title case prefix for method names, e.g. "Get".
    pub fn method_prefix(&self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Put => "Put",
            HttpVerb::Delete => "Delete",
            HttpVerb::Patch => "Patch",
            HttpVerb::Head => "Head",
            HttpVerb::Options => "Options",
            HttpVerb::Trace => "Trace",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path item with its per-verb operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    /// GET operation.
    pub get: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
    /// HEAD operation.
    pub head: Option<Operation>,
    /// OPTIONS operation.
    pub options: Option<Operation>,
    /// TRACE operation.
    pub trace: Option<Operation>,
    /// Parameters shared by every operation of the path.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// The operation declared for `verb`.
    pub fn operation(&self, verb: HttpVerb) -> Option<&Operation> {
        match verb {
            HttpVerb::Get => self.get.as_ref(),
            HttpVerb::Post => self.post.as_ref(),
            HttpVerb::Put => self.put.as_ref(),
            HttpVerb::Delete => self.delete.as_ref(),
            HttpVerb::Patch => self.patch.as_ref(),
            HttpVerb::Head => self.head.as_ref(),
            HttpVerb::Options => self.options.as_ref(),
            HttpVerb::Trace => self.trace.as_ref(),
        }
    }

    /// Declared operations in emission order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpVerb, &Operation)> + '_ {
        HttpVerb::ALL
            .into_iter()
            .filter_map(move |verb| self.operation(verb).map(|op| (verb, op)))
    }
}

/// A single operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation id.
    pub operation_id: Option<String>,
    /// Short summary, emitted as the method doc comment.
    pub summary: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
    /// Operation parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Request body.
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status string ("200", "default", ...).
    #[serde(default, deserialize_with = "status_map")]
    pub responses: IndexMap<String, Response>,
}

/// A parameter (path, query, header, cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    /// Parameter name on the wire.
    pub name: String,
    /// Location (`path`, `query`, `header`, `cookie`).
    #[serde(rename = "in")]
    pub location: String,
    /// Description.
    pub description: Option<String>,
    /// Whether the parameter is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
    /// Value schema.
    pub schema: Option<SchemaNode>,
}

/// A request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    /// Description.
    pub description: Option<String>,
    /// Whether the body is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Media types in declared order.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    /// Description.
    pub description: Option<String>,
    /// Media types in declared order.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A media type entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    pub schema: Option<SchemaNode>,
}

/// Picks the JSON media type, falling back to the first declared one.
pub fn preferred_media(content: &IndexMap<String, MediaType>) -> Option<&MediaType> {
    content
        .iter()
        .find(|(media, _)| media.starts_with("application/json") || media.ends_with("+json"))
        .or_else(|| content.first())
        .map(|(_, media)| media)
}

fn status_map<'de, D>(deserializer: D) -> Result<IndexMap<String, Response>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<StatusKey, Response>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k.0, v)).collect())
}

/// A validated OpenAPI document.
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    /// The `openapi` version marker.
    pub openapi: String,
    /// Document info.
    pub info: Info,
    /// URL templates mapped to path items, in document order.
    pub paths: IndexMap<String, PathItem>,
    /// Components (empty when absent).
    pub components: Components,
}

impl TryFrom<ShimOpenApi> for OpenApiDocument {
    type Error = AppError;

    fn try_from(shim: ShimOpenApi) -> AppResult<Self> {
        let missing = |field: &str| AppError::MissingRequiredDocumentField(field.to_string());

        let openapi = shim
            .openapi
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing("openapi"))?;
        let info = shim.info.ok_or_else(|| missing("info"))?;
        let title = info
            .title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| missing("info.title"))?;
        let version = info
            .version
            .filter(|v| !v.is_empty())
            .ok_or_else(|| missing("info.version"))?;

        Ok(Self {
            openapi,
            info: Info {
                title,
                version,
                summary: info.summary,
                description: info.description,
            },
            paths: shim.paths.items,
            components: shim.components.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shim(json: &str) -> ShimOpenApi {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let cases = [
            (r#"{"info": {"title": "T", "version": "1"}}"#, "openapi"),
            (r#"{"openapi": "3.0.1"}"#, "info"),
            (r#"{"openapi": "3.0.1", "info": {"version": "1"}}"#, "info.title"),
            (r#"{"openapi": "3.0.1", "info": {"title": "T"}}"#, "info.version"),
            (r#"{"openapi": "3.0.1", "info": {"title": "T", "version": ""}}"#, "info.version"),
        ];
        for (json, field) in cases {
            match OpenApiDocument::try_from(shim(json)) {
                Err(AppError::MissingRequiredDocumentField(f)) => assert_eq!(f, field),
                other => panic!("expected missing '{}', got {:?}", field, other.map(|d| d.info)),
            }
        }
    }

    #[test]
    fn test_version_tag_and_namespace() {
        let doc = OpenApiDocument::try_from(shim(
            r#"{"openapi": "3.0.1", "info": {"title": "KL quiz", "version": "3.0.1"}}"#,
        ))
        .unwrap();
        let mut names = ClassNameCache::new();
        assert_eq!(doc.info.version_tag(), "3");
        assert_eq!(doc.info.namespace(&mut names), "KLQuizApiClientV3");
        assert_eq!(doc.info.models_namespace(&mut names), "KLQuizApiClientV3.Models");
        assert!(doc.components.schemas.is_empty());
    }

    #[test]
    fn test_operations_in_verb_order() {
        let item: PathItem = serde_json::from_str(
            r#"{"trace": {}, "delete": {}, "get": {}, "options": {}}"#,
        )
        .unwrap();
        let verbs: Vec<HttpVerb> = item.operations().map(|(v, _)| v).collect();
        assert_eq!(
            verbs,
            [HttpVerb::Get, HttpVerb::Delete, HttpVerb::Options, HttpVerb::Trace]
        );
    }

    #[test]
    fn test_preferred_media_prefers_json() {
        let body: RequestBody = serde_json::from_str(
            r#"{"content": {"text/plain": {}, "application/json": {"schema": {"type": "string"}}}}"#,
        )
        .unwrap();
        let media = preferred_media(&body.content).unwrap();
        assert!(media.schema.is_some());
    }
}
