#![deny(missing_docs)]

//! # OpenAPI Module
//!
//! - **shims**: Raw deserialization layer.
//! - **document** / **schema**: The validated input model.
//! - **naming**: Name derivation shared by every emitter.
//! - **models**: Resolved types.
//! - **registry**: Dedup registry and pending queue.
//! - **resolver**: Schema to type resolution.
//! - **cycles**: By-value reference cycles between generated types.
//! - **unions**: `oneOf` derivation and the structural decoder.

pub mod cycles;
pub mod document;
pub mod models;
pub mod naming;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod shims;
pub mod unions;

use crate::error::AppResult;

pub use cycles::{box_cyclic_fields, ReferenceGraph};
pub use document::{
    HttpVerb, Info, MediaType, OpenApiDocument, Operation, Parameter, PathItem, RequestBody,
    Response,
};
pub use models::{EnumType, Field, Primitive, RecordType, ResolvedType, UnionMarker, UnionVariant};
pub use registry::{PendingQueue, PendingSchema, TypeRegistry, UnionGroup};
pub use resolver::{Discovered, Resolved, Resolver};
pub use schema::{SchemaMeta, SchemaNode, SchemaShape};
pub use unions::{derive_union, DecodedVariant, DeserializationPlan, DerivedUnion};

/// Parses an OpenAPI document from JSON or YAML text and validates its top-level fields.
///
/// JSON is tried first so its error wins for text that looks like JSON.
pub fn parse_openapi_document(text: &str) -> AppResult<OpenApiDocument> {
    let shim: shims::ShimOpenApi = if text.trim_start().starts_with('{') {
        serde_json::from_str(text)?
    } else {
        serde_yaml::from_str(text)?
    };
    OpenApiDocument::try_from(shim)
}
