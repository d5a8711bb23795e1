#![deny(missing_docs)]

//! # Client Generator
//!
//! Generates one API client per first path segment, with one async method per
//! (path, verb) pair.
//!
//! Types are requested from the same [`Resolver`] the model pass used, so a method
//! signature names exactly the types the data classes were generated under. Inline
//! request and response schemas are resolved under `<Verb><Method>Request` /
//! `<Verb><Method>Response` and reported back as [`Discovered`] work for the model
//! generator.

use crate::codegen::{doc_comment, validate_source};
use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::oas::document::{
    preferred_media, HttpVerb, Info, OpenApiDocument, Operation, Parameter, PathItem, Response,
};
use crate::oas::models::{Primitive, ResolvedType};
use crate::oas::naming::{method_name_from_path, title_case, to_snake_ident};
use crate::oas::resolver::{Discovered, Resolver};
use crate::strategies::{ClientStrategy, ParamBinding, ResponseShape};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Header parameter filled with the document version instead of an argument.
pub const API_VERSION_HEADER: &str = "api-version";

/// Identifiers used by generated method bodies; arguments named like them get a
/// `_param` suffix.
const RESERVED_IDENTS: &[&str] = &["url", "request", "response", "bytes", "value", "values"];

/// Statuses whose body may be empty.
const BODILESS_STATUSES: &[&str] = &["201", "202", "204"];

/// A type name a client method refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// The client type.
    pub client: String,
    /// The referenced type name.
    pub target: String,
}

/// Result of the operation pass.
#[derive(Debug, Default)]
pub struct GeneratedClients {
    /// Unit name to source text: the error unit, then one unit per client.
    pub units: IndexMap<String, String>,
    /// Inline schemas the model pass still has to generate.
    pub discovered: Discovered,
    /// Every type name used by a generated method.
    pub references: Vec<TypeReference>,
    /// Number of generated methods.
    pub methods: usize,
    /// Operation-level problems that were logged and skipped.
    pub issues: Vec<AppError>,
}

/// Where an argument goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgLocation {
    Path,
    Query,
    Header,
    Body,
}

#[derive(Debug, Clone)]
struct MethodArg {
    ident: String,
    wire: String,
    ty: String,
    location: ArgLocation,
    required: bool,
    repeated: bool,
    description: Option<String>,
}

impl MethodArg {
    fn declaration(&self) -> String {
        if self.required {
            format!("{}: {}", self.ident, self.ty)
        } else {
            format!("{}: Option<{}>", self.ident, self.ty)
        }
    }

    fn binding(&self) -> ParamBinding<'_> {
        ParamBinding {
            wire: &self.wire,
            ident: &self.ident,
            optional: !self.required,
            repeated: self.repeated,
        }
    }
}

/// Everything needed to render one method.
#[derive(Debug)]
struct MethodPlan<'d> {
    name: String,
    verb: HttpVerb,
    path: &'d str,
    operation: &'d Operation,
    status: String,
    args: Vec<MethodArg>,
    constant_headers: Vec<(String, String)>,
    url_template: String,
    path_args: Vec<String>,
    response: ResponseShape,
    types: Vec<ResolvedType>,
}

/// Generates the clients of `document` with `strategy`.
pub fn generate_clients(
    strategy: &impl ClientStrategy,
    resolver: &mut Resolver,
    document: &OpenApiDocument,
    config: &GeneratorConfig,
) -> GeneratedClients {
    let namespace = document.info.namespace(resolver.names_mut());
    let mut output = GeneratedClients::default();
    output.units.insert(
        strategy.error_unit_name().to_string(),
        strategy.error_unit(&namespace),
    );

    for (segment, operations) in group_by_segment(&document.paths) {
        let client = client_name(resolver, &segment, &document.info);
        let mut code = strategy.client_imports(&namespace);
        code.push_str(&strategy.client_struct(&client, &segment));

        let mut method_names = HashSet::new();
        let mut references = Vec::new();
        let mut discovered = Discovered::default();
        let mut methods = 0;

        for (path, item, verb, operation) in operations {
            let mut local = Discovered::default();
            let mut plan = match plan_method(
                resolver,
                &document.info,
                path,
                item,
                verb,
                operation,
                &mut local,
            ) {
                Ok(Some(plan)) => plan,
                Ok(None) => continue,
                Err(err) => {
                    warn!(path, verb = %verb, error = %err, "skipping operation");
                    output.issues.push(err);
                    continue;
                }
            };
            discovered.absorb(local);

            let base = plan.name.clone();
            let mut counter = 2;
            while !method_names.insert(plan.name.clone()) {
                plan.name = format!("{}{}", base, counter);
                counter += 1;
            }
            if plan.name != base {
                warn!(client = %client, method = %base, renamed = %plan.name, "duplicate method name");
            }

            for ty in &plan.types {
                references.extend(ty.referenced_names().into_iter().map(|target| TypeReference {
                    client: client.clone(),
                    target: target.to_string(),
                }));
            }

            code.push('\n');
            code.push_str(&render_method(strategy, &plan, config.emit_metadata));
            methods += 1;
        }
        code.push_str(&strategy.client_end());

        if config.verify_syntax {
            if let Err(err) = validate_source(&code) {
                warn!(client = %client, error = %err, "skipping client");
                output.issues.push(err);
                continue;
            }
        }

        debug!(client = %client, methods, "client generated");
        output.methods += methods;
        output.discovered.absorb(discovered);
        output.references.extend(references);
        output.units.insert(client, code);
    }

    info!(
        clients = output.units.len() - 1,
        methods = output.methods,
        "clients generated"
    );
    output
}

/// `TitleCase(ClassName(segment)) + "ClientV" + tag`.
pub fn client_name(resolver: &mut Resolver, segment: &str, info: &Info) -> String {
    format!(
        "{}ClientV{}",
        title_case(&resolver.class_name(Some(segment))),
        info.version_tag()
    )
}

/// Picks `200`, else the first other 2xx response.
pub fn select_response(responses: &IndexMap<String, Response>) -> Option<(&str, &Response)> {
    if let Some(ok) = responses.get("200") {
        return Some(("200", ok));
    }
    responses
        .iter()
        .find(|(status, _)| {
            status
                .parse::<u16>()
                .map(|code| (201..=299).contains(&code))
                .unwrap_or(false)
        })
        .map(|(status, response)| (status.as_str(), response))
}

type GroupedOperations<'d> = Vec<(&'d str, &'d PathItem, HttpVerb, &'d Operation)>;

fn group_by_segment(paths: &IndexMap<String, PathItem>) -> IndexMap<String, GroupedOperations<'_>> {
    let mut groups: IndexMap<String, GroupedOperations<'_>> = IndexMap::new();
    for (path, item) in paths {
        let segment = path.split('/').nth(1).unwrap_or_default().to_string();
        let entry = groups.entry(segment).or_default();
        for (verb, operation) in item.operations() {
            entry.push((path.as_str(), item, verb, operation));
        }
    }
    groups
}

/// Path-level parameters overridden by operation parameters with the same name and
/// location.
fn merged_parameters<'d>(item: &'d PathItem, operation: &'d Operation) -> Vec<&'d Parameter> {
    let mut merged: Vec<&Parameter> = item
        .parameters
        .iter()
        .filter(|shared| {
            !operation
                .parameters
                .iter()
                .any(|p| p.name == shared.name && p.location == shared.location)
        })
        .collect();
    merged.extend(operation.parameters.iter());
    merged
}

fn plan_method<'d>(
    resolver: &mut Resolver,
    info: &Info,
    path: &'d str,
    item: &'d PathItem,
    verb: HttpVerb,
    operation: &'d Operation,
    discovered: &mut Discovered,
) -> AppResult<Option<MethodPlan<'d>>> {
    let Some((status, response)) = select_response(&operation.responses) else {
        warn!(path, verb = %verb, "no 2xx response, skipping operation");
        return Ok(None);
    };

    let stem = title_case(&method_name_from_path(path));
    let name = to_snake_ident(&format!("{}{}", verb.method_prefix(), stem));
    let mut types = Vec::new();
    let mut args = Vec::new();
    let mut constant_headers = Vec::new();
    let mut used = HashSet::new();

    for param in merged_parameters(item, operation) {
        let location = match param.location.as_str() {
            "path" => ArgLocation::Path,
            "query" => ArgLocation::Query,
            "header" if param.name.eq_ignore_ascii_case(API_VERSION_HEADER) => {
                constant_headers.push((param.name.clone(), info.version.clone()));
                continue;
            }
            "header" => ArgLocation::Header,
            other => {
                warn!(path, verb = %verb, parameter = %param.name, location = other, "unsupported parameter location, dropping parameter");
                continue;
            }
        };
        let ty = match &param.schema {
            Some(schema) => resolver.resolve_property(&param.name, schema, discovered)?,
            None => ResolvedType::Primitive(Primitive::String),
        };
        args.push(MethodArg {
            ident: unique_ident(&to_snake_ident(&param.name), &mut used),
            wire: param.name.clone(),
            ty: ty.rust_type(),
            location,
            required: location == ArgLocation::Path || param.required,
            repeated: matches!(ty, ResolvedType::Array(_)),
            description: param.description.clone(),
        });
        types.push(ty);
    }

    if let Some(body) = &operation.request_body {
        if let Some(schema) = preferred_media(&body.content).and_then(|m| m.schema.as_ref()) {
            let key = format!("{}{}Request", verb.method_prefix(), stem);
            let ty = resolver.resolve_property(&key, schema, discovered)?;
            let ident = match &ty {
                ResolvedType::Reference(name) if schema.reference_target().is_some() => {
                    to_snake_ident(name)
                }
                _ => "body".to_string(),
            };
            args.push(MethodArg {
                ident: unique_ident(&ident, &mut used),
                wire: String::new(),
                ty: ty.rust_type(),
                location: ArgLocation::Body,
                required: body.required,
                repeated: false,
                description: body.description.clone(),
            });
            types.push(ty);
        }
    }
    // Required arguments first, declared order otherwise.
    args.sort_by_key(|arg| !arg.required);

    let (url_template, path_args) = url_template(path, &args);

    let response = match preferred_media(&response.content).and_then(|m| m.schema.as_ref()) {
        None => ResponseShape::Empty,
        Some(schema) => {
            let key = format!("{}{}Response", verb.method_prefix(), stem);
            let ty = resolver.resolve_property(&key, schema, discovered)?;
            let rust_type = ty.rust_type();
            types.push(ty);
            if BODILESS_STATUSES.contains(&status) || schema.meta.nullable {
                ResponseShape::OptionalJson(rust_type)
            } else {
                ResponseShape::Json(rust_type)
            }
        }
    };

    Ok(Some(MethodPlan {
        name,
        verb,
        path,
        operation,
        status: status.to_string(),
        args,
        constant_headers,
        url_template,
        path_args,
        response,
        types,
    }))
}

fn unique_ident(ident: &str, used: &mut HashSet<String>) -> String {
    let base = if RESERVED_IDENTS.contains(&ident) {
        format!("{}_param", ident)
    } else {
        ident.to_string()
    };
    let mut candidate = base.clone();
    let mut counter = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{}{}", base, counter);
        counter += 1;
    }
    candidate
}

/// Turns `/users/{id}` into a `format!` template (`/users/{}`) plus the path argument
/// identifiers in order. Placeholders without a path argument stay literal.
fn url_template(path: &str, args: &[MethodArg]) -> (String, Vec<String>) {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    let placeholder =
        PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex"));

    let mut template = String::new();
    let mut path_args = Vec::new();
    let mut last = 0;
    for captures in placeholder.captures_iter(path) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        template.push_str(&escape_braces(&path[last..whole.start()]));
        match args
            .iter()
            .find(|arg| arg.location == ArgLocation::Path && arg.wire == name.as_str())
        {
            Some(arg) => {
                template.push_str("{}");
                path_args.push(arg.ident.clone());
            }
            None => template.push_str(&escape_braces(whole.as_str())),
        }
        last = whole.end();
    }
    template.push_str(&escape_braces(&path[last..]));
    (template, path_args)
}

fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

fn render_method(strategy: &impl ClientStrategy, plan: &MethodPlan<'_>, emit_metadata: bool) -> String {
    let operation = plan.operation;
    let mut code = String::new();

    if emit_metadata {
        code.push_str(&format!("    // Operation: {} {}\n", plan.verb, plan.path));
        if let Some(id) = &operation.operation_id {
            code.push_str(&format!("    // Operation ID: {}\n", id));
        }
        code.push_str(&format!("    // Response: {}\n", plan.status));
    }

    let summary = operation.summary.as_deref().or(operation.description.as_deref());
    code.push_str(&doc_comment(summary, "    "));
    if summary.is_some() {
        code.push_str("    ///\n");
    }
    code.push_str(&format!("    /// `{} {}`\n", plan.verb, plan.path));
    let documented: Vec<&MethodArg> = plan
        .args
        .iter()
        .filter(|arg| arg.description.is_some())
        .collect();
    if !documented.is_empty() {
        code.push_str("    ///\n    /// # Arguments\n    ///\n");
        for arg in documented {
            let text = arg.description.as_deref().unwrap_or_default();
            code.push_str(&format!(
                "    /// * `{}` - {}\n",
                arg.ident,
                text.lines().next().unwrap_or_default().trim()
            ));
        }
    }
    if operation.deprecated {
        code.push_str("    #[deprecated]\n");
    }

    let declarations: Vec<String> = plan.args.iter().map(MethodArg::declaration).collect();
    code.push_str(&strategy.method_signature(&plan.name, &declarations, &plan.response));
    code.push_str(&strategy.url_statement(&plan.url_template, &plan.path_args));
    code.push_str(&strategy.request_statement(plan.verb));
    for arg in &plan.args {
        match arg.location {
            ArgLocation::Query => code.push_str(&strategy.query_statement(arg.binding())),
            ArgLocation::Header => code.push_str(&strategy.header_statement(arg.binding())),
            ArgLocation::Path | ArgLocation::Body => {}
        }
    }
    for (name, value) in &plan.constant_headers {
        code.push_str(&strategy.constant_header_statement(name, value));
    }
    if let Some(body) = plan.args.iter().find(|arg| arg.location == ArgLocation::Body) {
        code.push_str(&strategy.body_statement(&body.ident, !body.required));
    }
    code.push_str(&strategy.send_statement(plan.path));
    code.push_str(&strategy.response_statement(&plan.response));
    code
}
