#![deny(missing_docs)]

//! # Primitive Mapping
//!
//! The fixed `(type, format)` table. Pairs outside it are errors, never a silent
//! fallback to `String`.

use crate::error::{AppError, AppResult};
use crate::oas::models::Primitive;

/// Maps a scalar `(type, format)` pair to a target primitive.
///
/// `key` is the schema or property being resolved and only appears in errors.
pub fn map_primitive(kind: &str, format: Option<&str>, key: &str) -> AppResult<Primitive> {
    let unsupported_format = |format: &str| AppError::UnsupportedFormat {
        kind: kind.to_string(),
        format: format.to_string(),
        key: key.to_string(),
    };

    match kind {
        "integer" => match format {
            None | Some("int32") => Ok(Primitive::Int32),
            Some("int64") => Ok(Primitive::Int64),
            Some(other) => Err(unsupported_format(other)),
        },
        "number" => match format {
            None | Some("float") => Ok(Primitive::Float32),
            Some("double") => Ok(Primitive::Float64),
            Some(other) => Err(unsupported_format(other)),
        },
        "boolean" => Ok(Primitive::Bool),
        "string" => match format {
            None | Some("string") => Ok(Primitive::String),
            Some("date-time") => Ok(Primitive::DateTime),
            Some("date") => Ok(Primitive::Date),
            Some("time") => Ok(Primitive::Time),
            Some("uuid") => Ok(Primitive::Uuid),
            Some("binary") => Ok(Primitive::Binary),
            Some("uri") => Ok(Primitive::Uri),
            Some(other) => Err(unsupported_format(other)),
        },
        "null" | "object" => Ok(Primitive::Untyped),
        other => Err(AppError::UnsupportedSchemaKind {
            kind: other.to_string(),
            key: key.to_string(),
        }),
    }
}
