#![deny(missing_docs)]

//! # Scaffolding
//!
//! Logic for generating client structs, imports, and method signatures.

use crate::oas::naming::module_file_name;
use crate::strategies::traits::ResponseShape;

/// Returns the header and imports of a client unit.
///
/// Client units live in `api/`, next to the `models/` directory. `shared` are the
/// types of the error unit.
pub fn client_imports(namespace: &str, error_unit: &str, shared: &[&str]) -> String {
    let mut imports = format!("//! Generated from `{}`.\n", namespace);
    imports.push_str("#![allow(unused_imports, clippy::too_many_arguments)]\n\n");
    imports.push_str("use super::super::models::*;\n");
    imports.push_str(&format!(
        "use super::{}::{{param_value, {}}};\n\n",
        module_file_name(error_unit),
        shared.join(", ")
    ));
    imports
}

/// Generates the client struct, its constructor and opens the `impl` block.
pub fn client_struct(name: &str, segment: &str) -> String {
    let mut code = String::new();
    code.push_str(&format!("/// Client for the `/{}` operations.\n", segment));
    code.push_str("#[derive(Debug, Clone)]\n");
    code.push_str(&format!("pub struct {} {{\n", name));
    code.push_str("    http: reqwest::Client,\n");
    code.push_str("    base_url: String,\n");
    code.push_str("}\n\n");
    code.push_str(&format!("impl {} {{\n", name));
    code.push_str("    /// Creates a client sending requests to `base_url` through `http`.\n");
    code.push_str("    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {\n");
    code.push_str("        let mut base_url = base_url.into();\n");
    code.push_str("        while base_url.ends_with('/') {\n");
    code.push_str("            base_url.pop();\n");
    code.push_str("        }\n");
    code.push_str("        Self { http, base_url }\n");
    code.push_str("    }\n");
    code
}

/// Closes the `impl` block.
pub fn client_end() -> String {
    "}\n".to_string()
}

/// Generates an async method signature returning `Result<_, ApiError>`.
pub fn method_signature(name: &str, args: &[String], response: &ResponseShape) -> String {
    let mut all_args = vec!["&self".to_string()];
    all_args.extend(args.iter().cloned());
    format!(
        "    pub async fn {}({}) -> Result<{}, ApiError> {{\n",
        name,
        all_args.join(", "),
        response.return_type()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_reach_models_and_error_unit() {
        let imports = client_imports("TestApiClientV1", "ApiError", &["ApiError", "ProblemDetails"]);
        assert!(imports.starts_with("//! Generated from `TestApiClientV1`.\n"));
        assert!(imports.contains("use super::super::models::*;\n"));
        assert!(imports.contains("use super::api_error::{param_value, ApiError, ProblemDetails};\n"));
    }

    #[test]
    fn test_client_struct() {
        let code = client_struct("UsersClientV1", "users");
        assert!(code.starts_with("/// Client for the `/users` operations.\n"));
        assert!(code.contains("pub struct UsersClientV1 {\n"));
        assert!(code.contains("impl UsersClientV1 {\n"));
        assert!(code.contains("Self { http, base_url }"));
    }

    #[test]
    fn test_method_signature() {
        assert_eq!(
            method_signature("get_users", &[], &ResponseShape::Json("Vec<User>".into())),
            "    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {\n"
        );
        assert_eq!(
            method_signature(
                "delete_id",
                &["id: i32".into(), "force: Option<bool>".into()],
                &ResponseShape::Empty
            ),
            "    pub async fn delete_id(&self, id: i32, force: Option<bool>) -> Result<(), ApiError> {\n"
        );
    }
}
