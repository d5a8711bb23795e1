#![deny(missing_docs)]

//! # oasgen Core
//!
//! Core library of the OpenAPI to Rust generator: schema resolution, `oneOf` unions,
//! data-class and client emission.

/// Shared error types.
pub mod error;

/// Generation options.
pub mod config;

/// OpenAPI (OAS) document model and schema resolution.
pub mod oas;

/// Code generation utilities.
pub mod codegen;

/// Data-class pass.
pub mod model_generator;

/// Operation pass.
pub mod client_generator;

/// Strategy Pattern Interfaces.
pub mod strategies;

/// End-to-end generation run.
pub mod pipeline;

pub use client_generator::{generate_clients, GeneratedClients};
pub use codegen::{generate_enum, generate_module_index, generate_record, validate_source};
pub use config::GeneratorConfig;
pub use error::{AppError, AppResult};
pub use model_generator::{GeneratedModels, ModelGenerator};
pub use oas::{
    parse_openapi_document, DeserializationPlan, OpenApiDocument, ResolvedType, Resolver,
    SchemaNode, TypeRegistry,
};
pub use pipeline::{generate, generate_from_str, generate_with, GenerationOutput};
pub use strategies::{ClientStrategy, ReqwestStrategy};
