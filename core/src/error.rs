//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Schema-level variants (`UnsupportedSchemaKind`, `UnsupportedFormat`,
//! `MissingVariantTitle`) are fatal to the one schema being generated; the model
//! generator logs them and moves on. Document-level variants abort the run.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document is not valid JSON.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// The document is not valid YAML.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// The document lacks a field that generation cannot start without.
    #[from(ignore)]
    #[display("Missing required document field: {_0}")]
    MissingRequiredDocumentField(String),

    /// A schema `type` string with no mapping rule.
    #[from(ignore)]
    #[display("Unsupported schema kind '{kind}' for '{key}'")]
    UnsupportedSchemaKind {
        /// The offending `type` value.
        kind: String,
        /// The schema or property key being resolved.
        key: String,
    },

    /// A recognized `type` paired with a `format` outside the mapping table.
    #[from(ignore)]
    #[display("Unsupported format '{format}' for type '{kind}' at '{key}'")]
    UnsupportedFormat {
        /// The schema `type`.
        kind: String,
        /// The unrecognized `format`.
        format: String,
        /// The schema or property key being resolved.
        key: String,
    },

    /// A `oneOf` entry without a `title`, so no variant name can be derived.
    #[from(ignore)]
    #[display("oneOf variant #{index} of '{owner}' has no title")]
    MissingVariantTitle {
        /// The property owning the union.
        owner: String,
        /// Position of the variant in the `oneOf` list.
        index: usize,
    },

    /// A forward reference to a type that never got generated.
    #[from(ignore)]
    #[display("Type '{owner}' references '{target}' which was never generated")]
    UnresolvedForwardReference {
        /// The type holding the reference.
        owner: String,
        /// The missing type name.
        target: String,
    },

    /// A reference to a schema the configuration excludes from the models.
    #[from(ignore)]
    #[display("Type '{owner}' references '{target}', which is excluded from the models")]
    SkippedSchemaReference {
        /// The type holding the reference.
        owner: String,
        /// The excluded schema's type name.
        target: String,
    },

    /// A union value closed without any variant matching one of its properties.
    #[from(ignore)]
    #[display("Could not determine the variant of '{union}': no property matched any variant")]
    AmbiguousUnion {
        /// The union marker name.
        union: String,
    },

    /// A decoded property that matches no field of the selected variant.
    #[from(ignore)]
    #[display("Property '{field}' not found in variant '{variant}' of '{union}'")]
    UnknownUnionField {
        /// The union marker name.
        union: String,
        /// The selected variant type.
        variant: String,
        /// The unmatched property name.
        field: String,
    },

    /// An operation the generated code deliberately does not support.
    #[from(ignore)]
    #[display("Not supported: {_0}")]
    NotSupported(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
