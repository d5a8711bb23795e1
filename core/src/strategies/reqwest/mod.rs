#![deny(missing_docs)]

//! # Reqwest Strategy Module
//!
//! Implementation of `ClientStrategy` for async `reqwest` clients.
//! Relies on submodules for specific generation logic (scaffolding, requests, errors).

pub mod errors;
pub mod requests;
pub mod scaffolding;

use crate::oas::document::HttpVerb;
use crate::strategies::traits::{ClientStrategy, ParamBinding, ResponseShape};

/// Strategy for generating `reqwest` based clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestStrategy;

impl ClientStrategy for ReqwestStrategy {
    // --- Scaffolding ---

    fn client_imports(&self, namespace: &str) -> String {
        scaffolding::client_imports(namespace, self.error_unit_name(), self.error_unit_types())
    }

    fn client_struct(&self, name: &str, segment: &str) -> String {
        scaffolding::client_struct(name, segment)
    }

    fn client_end(&self) -> String {
        scaffolding::client_end()
    }

    fn method_signature(&self, name: &str, args: &[String], response: &ResponseShape) -> String {
        scaffolding::method_signature(name, args, response)
    }

    // --- Request building ---

    fn url_statement(&self, template: &str, path_args: &[String]) -> String {
        requests::url_statement(template, path_args)
    }

    fn request_statement(&self, verb: HttpVerb) -> String {
        requests::request_statement(verb)
    }

    fn query_statement(&self, param: ParamBinding<'_>) -> String {
        requests::query_statement(param)
    }

    fn header_statement(&self, param: ParamBinding<'_>) -> String {
        requests::header_statement(param)
    }

    fn constant_header_statement(&self, name: &str, value: &str) -> String {
        requests::constant_header_statement(name, value)
    }

    fn body_statement(&self, ident: &str, optional: bool) -> String {
        requests::body_statement(ident, optional)
    }

    fn send_statement(&self, path: &str) -> String {
        requests::send_statement(path)
    }

    fn response_statement(&self, response: &ResponseShape) -> String {
        requests::response_statement(response)
    }

    // --- Shared units ---

    fn error_unit_name(&self) -> &'static str {
        errors::ERROR_UNIT
    }

    fn error_unit_types(&self) -> &'static [&'static str] {
        errors::ERROR_UNIT_TYPES
    }

    fn error_unit(&self, namespace: &str) -> String {
        errors::error_unit(namespace)
    }
}
