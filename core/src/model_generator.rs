#![deny(missing_docs)]

//! # Model Generator
//!
//! Drives the data-class pass.
//!
//! 1. Every `components/schemas` entry is generated in document order.
//! 2. The pending queue is drained FIFO, then the queued `oneOf` groups are derived.
//!    Both can discover more work, so step 2 repeats until nothing is left.
//! 3. Every forward reference is checked against the registry.
//! 4. Fields closing a by-value reference cycle are boxed and their units re-rendered.
//!
//! A type name is claimed *before* its properties are resolved, which bounds recursion
//! on self-referential schemas. A schema that fails (unsupported kind or format,
//! untitled variant, unparsable output) is logged and skipped: its claimed name is
//! released and whatever it discovered is never committed.

use crate::codegen::{
    codec_name, generate_enum, generate_plan, generate_record, generate_union_marker,
    generate_union_variant, schema_metadata, validate_source,
};
use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::oas::cycles::box_cyclic_fields;
use crate::oas::models::ResolvedType;
use crate::oas::registry::{PendingQueue, PendingSchema, TypeRegistry, UnionGroup};
use crate::oas::resolver::{Discovered, Resolver};
use crate::oas::schema::{SchemaNode, SchemaShape};
use crate::oas::unions::{derive_union, DeserializationPlan};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};

/// Result of the data-class pass.
#[derive(Debug, Default)]
pub struct GeneratedModels {
    /// Unit name to source text, in generation order.
    pub units: IndexMap<String, String>,
    /// Every generated type, in generation order.
    pub types: Vec<ResolvedType>,
    /// One plan per generated union group.
    pub plans: Vec<DeserializationPlan>,
    /// Schema-level problems that were logged and skipped.
    pub issues: Vec<AppError>,
}

/// State of one data-class pass.
#[derive(Debug)]
pub struct ModelGenerator<'c> {
    config: &'c GeneratorConfig,
    namespace: String,
    registry: TypeRegistry,
    pending: PendingQueue,
    unions: VecDeque<UnionGroup>,
    forward: HashSet<String>,
    metadata: HashMap<String, String>,
    output: GeneratedModels,
}

impl<'c> ModelGenerator<'c> {
    /// Creates a generator emitting into `namespace` (the models namespace).
    pub fn new(config: &'c GeneratorConfig, namespace: &str) -> Self {
        Self {
            config,
            namespace: namespace.to_string(),
            registry: TypeRegistry::new(),
            pending: PendingQueue::new(),
            unions: VecDeque::new(),
            forward: HashSet::new(),
            metadata: HashMap::new(),
            output: GeneratedModels::default(),
        }
    }

    /// The registry of this run.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Generates the top-level schemas, then runs to a fixed point.
    pub fn generate_components(
        &mut self,
        resolver: &mut Resolver,
        schemas: &IndexMap<String, SchemaNode>,
    ) {
        for (key, schema) in schemas {
            let class_name = resolver.class_name(Some(key));
            if self.config.is_skipped(&class_name) {
                debug!(schema = %key, "skipping built-in schema");
                continue;
            }
            self.generate_top_level(resolver, key, schema);
        }
        self.run_to_fixed_point(resolver);
    }

    /// Commits work discovered elsewhere (e.g. by the operation pass) and generates it.
    pub fn generate_discovered(&mut self, resolver: &mut Resolver, discovered: Discovered) {
        self.commit(resolver, discovered);
        self.run_to_fixed_point(resolver);
    }

    /// Checks references, boxes cyclic fields and returns the output.
    pub fn finish(mut self) -> GeneratedModels {
        let mut dangling = Vec::new();
        for ty in &self.output.types {
            let Some(owner) = ty.type_name() else {
                continue;
            };
            for target in ty.referenced_names() {
                if self.registry.contains(target) {
                    continue;
                }
                if self.config.is_skipped(target) {
                    dangling.push(AppError::SkippedSchemaReference {
                        owner: owner.to_string(),
                        target: target.to_string(),
                    });
                } else if self.forward.contains(target) {
                    dangling.push(AppError::UnresolvedForwardReference {
                        owner: owner.to_string(),
                        target: target.to_string(),
                    });
                } else {
                    warn!(owner, target, "reference to a type that was not generated");
                }
            }
        }
        for err in dangling {
            warn!(error = %err, "inconsistent type graph");
            self.output.issues.push(err);
        }

        for name in box_cyclic_fields(&mut self.output.types) {
            debug!(name = %name, "boxing fields on a reference cycle");
            self.rerender(&name);
        }

        info!(
            types = self.output.types.len(),
            units = self.output.units.len(),
            skipped = self.output.issues.len(),
            "data classes generated"
        );
        self.output
    }

    fn run_to_fixed_point(&mut self, resolver: &mut Resolver) {
        loop {
            while let Some(pending) = self.pending.pop() {
                self.generate_pending(resolver, pending);
            }
            if self.unions.is_empty() {
                break;
            }
            while let Some(group) = self.unions.pop_front() {
                self.generate_union(resolver, group);
            }
        }
    }

    fn generate_top_level(&mut self, resolver: &mut Resolver, key: &str, schema: &SchemaNode) {
        match &schema.shape {
            SchemaShape::Object { .. } | SchemaShape::Untyped | SchemaShape::Enum(_) => {
                self.generate_named(resolver, key, schema, schema)
            }
            SchemaShape::Array(Some(items)) if items.is_inline_object() => {
                self.generate_named(resolver, key, schema, items)
            }
            _ => {
                warn!(
                    schema = %key,
                    kind = schema.kind_label(),
                    "unsupported top-level schema type, skipping"
                );
            }
        }
    }

    fn generate_pending(&mut self, resolver: &mut Resolver, pending: PendingSchema) {
        self.generate_named(resolver, &pending.key, &pending.schema, &pending.schema);
    }

    /// Generates `body` as a named type. `declared` is the schema as written under
    /// `key`, used for metadata.
    fn generate_named(
        &mut self,
        resolver: &mut Resolver,
        key: &str,
        declared: &SchemaNode,
        body: &SchemaNode,
    ) {
        let name = resolver.class_name(Some(key));
        if !self.registry.claim(&name) {
            debug!(schema = %key, name = %name, "type already generated");
            return;
        }

        let metadata = self
            .config
            .emit_metadata
            .then(|| schema_metadata(key, declared));

        let attempt = self
            .render_named(resolver, &name, body, metadata.as_deref())
            .and_then(|(ty, discovered, code)| {
                self.verify(&code)?;
                Ok((ty, discovered, code))
            });

        match attempt {
            Ok((ty, discovered, code)) => {
                self.commit(resolver, discovered);
                if let Some(metadata) = metadata {
                    self.metadata.insert(name.clone(), metadata);
                }
                self.output.units.insert(name, code);
                self.output.types.push(ty);
            }
            Err(err) => {
                self.registry.release(&name);
                self.skip(key, err);
            }
        }
    }

    fn render_named(
        &self,
        resolver: &mut Resolver,
        name: &str,
        body: &SchemaNode,
        metadata: Option<&str>,
    ) -> AppResult<(ResolvedType, Discovered, String)> {
        if let SchemaShape::Enum(_) = body.shape {
            let en = resolver.resolve_enum(name, body, &self.namespace);
            let code = generate_enum(&en, metadata);
            return Ok((ResolvedType::Enum(en), Discovered::default(), code));
        }
        let resolved = resolver.resolve_record(name, body, &self.namespace)?;
        let code = match &resolved.ty {
            ResolvedType::Record(record) => generate_record(record, metadata),
            _ => String::new(),
        };
        Ok((resolved.ty, resolved.discovered, code))
    }

    fn generate_union(&mut self, resolver: &mut Resolver, group: UnionGroup) {
        let mut derived = match derive_union(resolver, &self.registry, &group, &self.namespace) {
            Ok(Some(derived)) => derived,
            Ok(None) => return,
            Err(err) => {
                self.skip(&group.owner, err);
                return;
            }
        };

        let mut seen = HashSet::new();
        derived.variants.retain(|variant| {
            let free = !self.registry.contains(&variant.name) && seen.insert(variant.name.clone());
            if !free {
                warn!(
                    union = %derived.marker.name,
                    variant = %variant.name,
                    "variant name already generated, dropping it from the union"
                );
            }
            free
        });
        derived.marker.variants = derived.variants.iter().map(|v| v.name.clone()).collect();
        derived.plan = DeserializationPlan::from_variants(&derived.marker.name, &derived.variants);

        let mut units = vec![(
            derived.marker.name.clone(),
            generate_union_marker(&derived.marker),
        )];
        for variant in &derived.variants {
            units.push((variant.name.clone(), generate_union_variant(variant)));
        }
        units.push((
            codec_name(&derived.marker.name),
            generate_plan(&derived.plan, &self.namespace),
        ));
        if let Err(err) = units.iter().try_for_each(|(_, code)| self.verify(code)) {
            self.skip(&group.owner, err);
            return;
        }

        self.registry.claim(&derived.marker.name);
        for variant in &derived.variants {
            self.registry.claim(&variant.name);
        }
        self.output.units.extend(units);

        self.output
            .types
            .push(ResolvedType::UnionMarker(derived.marker));
        self.output
            .types
            .extend(derived.variants.into_iter().map(ResolvedType::UnionVariant));
        self.output.plans.push(derived.plan);
        self.commit(resolver, derived.discovered);
    }

    fn rerender(&mut self, name: &str) {
        let Some(ty) = self.output.types.iter().find(|ty| ty.type_name() == Some(name)) else {
            return;
        };
        let code = match ty {
            ResolvedType::Record(record) => {
                generate_record(record, self.metadata.get(name).map(String::as_str))
            }
            ResolvedType::UnionVariant(variant) => generate_union_variant(variant),
            _ => return,
        };
        if let Some(unit) = self.output.units.get_mut(name) {
            *unit = code;
        }
    }

    fn commit(&mut self, resolver: &mut Resolver, discovered: Discovered) {
        for pending in &discovered.pending {
            self.forward.insert(resolver.class_name(Some(&pending.key)));
        }
        for group in &discovered.unions {
            self.forward.insert(resolver.union_base_name(&group.owner));
        }
        self.pending.extend(discovered.pending);
        self.unions.extend(discovered.unions);
    }

    fn verify(&self, code: &str) -> AppResult<()> {
        if self.config.verify_syntax {
            validate_source(code)?;
        }
        Ok(())
    }

    fn skip(&mut self, key: &str, err: AppError) {
        warn!(schema = %key, error = %err, "skipping schema");
        self.output.issues.push(err);
    }
}
