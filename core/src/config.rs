#![deny(missing_docs)]

//! # Generator Configuration

/// Top-level schemas skipped by default; the client error unit defines its own
/// `ProblemDetails`.
pub const DEFAULT_SKIPPED_SCHEMAS: &[&str] = &[
    "ProblemDetails",
    "HttpValidationProblemDetails",
    "ExceptionProblemDetails",
];

/// Options of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Prefix every unit with `// Schema: ...` / `// Operation: ...` comment blocks.
    pub emit_metadata: bool,
    /// Parse every generated unit and treat syntax errors as failures of its schema.
    pub verify_syntax: bool,
    /// Class names never generated from `components/schemas`.
    pub skipped_schemas: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            emit_metadata: false,
            verify_syntax: true,
            skipped_schemas: DEFAULT_SKIPPED_SCHEMAS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl GeneratorConfig {
    /// Whether a top-level schema with this class name is skipped.
    pub fn is_skipped(&self, class_name: &str) -> bool {
        self.skipped_schemas.iter().any(|s| s == class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert!(!config.emit_metadata);
        assert!(config.verify_syntax);
        assert!(config.is_skipped("HttpValidationProblemDetails"));
        assert!(!config.is_skipped("User"));
    }
}
