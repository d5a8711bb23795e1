#![deny(missing_docs)]

//! # oneOf Unions
//!
//! Derives the types of a `oneOf` group:
//! - a marker named `TitleCase(sanitize(owner)) + "OneOf"`,
//! - one variant per entry named `sanitize(owner) + sanitize(title)` (the owner is
//!   deliberately *not* title cased here, so `choice` yields `choiceA`),
//! - one [`DeserializationPlan`].

pub mod plan;

use crate::error::{AppError, AppResult};
use crate::oas::models::{UnionMarker, UnionVariant};
use crate::oas::naming::sanitize_key;
use crate::oas::registry::{TypeRegistry, UnionGroup};
use crate::oas::resolver::{Discovered, Resolver};
use tracing::debug;

pub use plan::{DecodedVariant, DeserializationPlan, FieldKey, VariantFields};

/// Everything one union group produces.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedUnion {
    /// The marker type.
    pub marker: UnionMarker,
    /// Variant types in declared order.
    pub variants: Vec<UnionVariant>,
    /// The structural decoder.
    pub plan: DeserializationPlan,
    /// Work found while resolving variant properties.
    pub discovered: Discovered,
}

/// Variant type name for a `oneOf` entry.
pub fn variant_name(owner: &str, title: &str) -> String {
    format!("{}{}", sanitize_key(Some(owner)), sanitize_key(Some(title)))
}

/// Derives marker, variants and plan for `group`.
///
/// Returns `Ok(None)` when the marker name is already registered, so a union reached
/// through several paths is generated once.
pub fn derive_union(
    resolver: &mut Resolver,
    registry: &TypeRegistry,
    group: &UnionGroup,
    namespace: &str,
) -> AppResult<Option<DerivedUnion>> {
    let base_name = resolver.union_base_name(&group.owner);
    if registry.contains(&base_name) {
        debug!(union = %base_name, owner = %group.owner, "oneOf group already generated");
        return Ok(None);
    }

    let mut discovered = Discovered::default();
    let mut variants = Vec::with_capacity(group.variants.len());

    for (index, schema) in group.variants.iter().enumerate() {
        let title = schema
            .meta
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::MissingVariantTitle {
                owner: group.owner.clone(),
                index,
            })?;
        let name = variant_name(&group.owner, title);
        let fields = resolver.resolve_fields(&name, schema, &mut discovered)?;
        variants.push(UnionVariant {
            name,
            namespace: namespace.to_string(),
            base_name: base_name.clone(),
            fields,
            description: schema.meta.description.clone(),
        });
    }

    let plan = DeserializationPlan::from_variants(&base_name, &variants);
    let marker = UnionMarker {
        name: base_name,
        namespace: namespace.to_string(),
        variants: variants.iter().map(|v| v.name.clone()).collect(),
    };

    Ok(Some(DerivedUnion {
        marker,
        variants,
        plan,
        discovered,
    }))
}
