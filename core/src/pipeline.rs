#![deny(missing_docs)]

//! # Pipeline
//!
//! One generation run: the data-class pass, then the operation pass, then whatever
//! inline schemas the operations uncovered, all on one [`Resolver`] and one registry.

use crate::client_generator::generate_clients;
use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::model_generator::ModelGenerator;
use crate::oas::models::ResolvedType;
use crate::oas::resolver::Resolver;
use crate::oas::unions::DeserializationPlan;
use crate::oas::{parse_openapi_document, OpenApiDocument};
use crate::strategies::{ClientStrategy, ReqwestStrategy};
use indexmap::IndexMap;
use tracing::{info, warn};

/// Everything a run produces.
#[derive(Debug, Default)]
pub struct GenerationOutput {
    /// Model unit name to source text, in resolver order.
    pub models: IndexMap<String, String>,
    /// Client unit name to source text; the error unit comes first.
    pub clients: IndexMap<String, String>,
    /// Every generated type.
    pub types: Vec<ResolvedType>,
    /// One runtime plan per union group.
    pub plans: Vec<DeserializationPlan>,
    /// Problems that were logged and skipped.
    pub issues: Vec<AppError>,
}

/// Generates models and `reqwest` clients for `document`.
pub fn generate(document: &OpenApiDocument, config: &GeneratorConfig) -> AppResult<GenerationOutput> {
    generate_with(&ReqwestStrategy, document, config)
}

/// Parses `text` as JSON or YAML and generates from it.
pub fn generate_from_str(text: &str, config: &GeneratorConfig) -> AppResult<GenerationOutput> {
    let document = parse_openapi_document(text)?;
    generate(&document, config)
}

/// Generates with a specific client strategy.
pub fn generate_with(
    strategy: &impl ClientStrategy,
    document: &OpenApiDocument,
    config: &GeneratorConfig,
) -> AppResult<GenerationOutput> {
    info!(
        title = %document.info.title,
        version = %document.info.version,
        openapi = %document.openapi,
        "generating"
    );

    let mut resolver = Resolver::new();
    let models_namespace = document.info.models_namespace(resolver.names_mut());

    let mut models = ModelGenerator::new(config, &models_namespace);
    models.generate_components(&mut resolver, &document.components.schemas);

    let clients = generate_clients(strategy, &mut resolver, document, config);
    if let Some(error_unit) = clients.units.get(strategy.error_unit_name()) {
        if config.verify_syntax {
            crate::codegen::validate_source(error_unit)?;
        }
    }
    models.generate_discovered(&mut resolver, clients.discovered);

    let mut issues = clients.issues;
    for reference in &clients.references {
        if models.registry().contains(&reference.target)
            || strategy.error_unit_types().contains(&reference.target.as_str())
        {
            continue;
        }
        warn!(
            client = %reference.client,
            target = %reference.target,
            "client method references a type that was not generated"
        );
        issues.push(AppError::UnresolvedForwardReference {
            owner: reference.client.clone(),
            target: reference.target.clone(),
        });
    }

    let generated = models.finish();
    issues.extend(generated.issues);

    info!(
        models = generated.units.len(),
        clients = clients.units.len(),
        issues = issues.len(),
        "generation finished"
    );

    Ok(GenerationOutput {
        models: generated.units,
        clients: clients.units,
        types: generated.types,
        plans: generated.plans,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_schemas_reach_the_models() {
        let yaml = r#"
openapi: 3.0.1
info: { title: Shop, version: "2" }
paths:
  /orders:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                sku: { type: string }
      responses:
        200:
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Order' }
components:
  schemas:
    Order:
      type: object
      properties:
        id: { type: integer }
"#;
        let output = generate_from_str(yaml, &GeneratorConfig::default()).unwrap();
        let models: Vec<&str> = output.models.keys().map(String::as_str).collect();
        assert_eq!(models, ["Order", "PostOrdersRequest"]);
        let clients: Vec<&str> = output.clients.keys().map(String::as_str).collect();
        assert_eq!(clients, ["ApiError", "OrdersClientV2"]);
        assert!(output.models["Order"].starts_with("//! Generated from `ShopApiClientV2.Models`."));
        assert!(output.issues.is_empty());
    }

    #[test]
    fn test_missing_response_type_is_reported() {
        let yaml = r#"
openapi: 3.0.1
info: { title: Shop, version: "2" }
paths:
  /orders:
    get:
      responses:
        200:
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Order' }
"#;
        let output = generate_from_str(yaml, &GeneratorConfig::default()).unwrap();
        assert!(output.models.is_empty());
        assert!(matches!(
            &output.issues[..],
            [AppError::UnresolvedForwardReference { owner, target }]
                if owner == "OrdersClientV2" && target == "Order"
        ));
    }

    #[test]
    fn test_problem_details_come_from_the_error_unit() {
        let yaml = r#"
openapi: 3.0.1
info: { title: Shop, version: "2" }
paths:
  /health:
    get:
      responses:
        200:
          content:
            application/json:
              schema: { $ref: '#/components/schemas/ProblemDetails' }
components:
  schemas:
    ProblemDetails:
      type: object
      properties:
        title: { type: string }
"#;
        let output = generate_from_str(yaml, &GeneratorConfig::default()).unwrap();
        assert!(output.models.is_empty());
        assert!(output.issues.is_empty());
        let client = &output.clients["HealthClientV2"];
        assert!(client.contains("use super::api_error::{param_value, ApiError, ProblemDetails};\n"));
        assert!(client.contains("-> Result<ProblemDetails, ApiError> {"));
    }
}
