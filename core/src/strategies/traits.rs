#![deny(missing_docs)]

//! # Client Strategy Trait
//!
//! Defines the interface required to render API clients for a specific HTTP library.
//! The operation emitter decides *what* a method does (arguments, URL, response
//! handling); a strategy decides how that reads in the target library.

use crate::oas::document::HttpVerb;

/// What a generated method returns on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseShape {
    /// No content; the method returns `()`.
    Empty,
    /// A JSON body that is always present.
    Json(String),
    /// A JSON body that may be absent (`201`/`202`/`204`) or `null`.
    OptionalJson(String),
}

impl ResponseShape {
    /// The success type of the method.
    pub fn return_type(&self) -> String {
        match self {
            ResponseShape::Empty => "()".to_string(),
            ResponseShape::Json(ty) => ty.clone(),
            ResponseShape::OptionalJson(ty) => format!("Option<{}>", ty),
        }
    }
}

/// How a parameter value is attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBinding<'a> {
    /// Name on the wire.
    pub wire: &'a str,
    /// Argument identifier in the generated method.
    pub ident: &'a str,
    /// The argument is an `Option`.
    pub optional: bool,
    /// The argument is a list sent as repeated entries.
    pub repeated: bool,
}

/// A strategy trait for decoupling library-specific client generation.
///
/// Every method returns source text. Statements are indented for a method body.
pub trait ClientStrategy {
    // --- Scaffolding ---

    /// Header and imports of a client unit.
    fn client_imports(&self, namespace: &str) -> String;

    /// The client struct, its constructor, and the opening of its `impl` block.
    ///
    /// # Arguments
    ///
    /// * `name` - The client type name (e.g. `UsersClientV1`).
    /// * `segment` - The first path segment grouping its operations.
    fn client_struct(&self, name: &str, segment: &str) -> String;

    /// Closes what [`ClientStrategy::client_struct`] opened.
    fn client_end(&self) -> String;

    /// Generates a method signature, including the opening brace.
    ///
    /// # Arguments
    ///
    /// * `name` - The method name.
    /// * `args` - Argument declarations (e.g. `user_id: i32`).
    /// * `response` - The success shape.
    fn method_signature(&self, name: &str, args: &[String], response: &ResponseShape) -> String;

    // --- Request building ---

    /// Builds the request URL from a `format!` template and its arguments.
    ///
    /// # Arguments
    ///
    /// * `template` - Path with one `{}` per path argument, other braces escaped.
    /// * `path_args` - Identifiers of the path arguments in template order.
    fn url_statement(&self, template: &str, path_args: &[String]) -> String;

    /// Creates the request for `verb`.
    fn request_statement(&self, verb: HttpVerb) -> String;

    /// Appends a query parameter.
    fn query_statement(&self, param: ParamBinding<'_>) -> String;

    /// Sets a header from an argument.
    fn header_statement(&self, param: ParamBinding<'_>) -> String;

    /// Sets a header to a fixed value.
    fn constant_header_statement(&self, name: &str, value: &str) -> String;

    /// Attaches a JSON body.
    fn body_statement(&self, ident: &str, optional: bool) -> String;

    /// Sends the request and turns a non-success status into an error.
    ///
    /// * `path` - The URL template, used in synthesized error titles.
    fn send_statement(&self, path: &str) -> String;

    /// Converts the response into the method's return value and closes the method.
    fn response_statement(&self, response: &ResponseShape) -> String;

    // --- Shared units ---

    /// Name of the unit holding the shared error type.
    fn error_unit_name(&self) -> &'static str;

    /// Types the shared error unit defines. Client units import them.
    fn error_unit_types(&self) -> &'static [&'static str];

    /// Source of the shared error unit.
    fn error_unit(&self, namespace: &str) -> String;
}
