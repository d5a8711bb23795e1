#![deny(missing_docs)]

//! # Reference Cycles
//!
//! Generated records embed the types they reference by value. A chain of by-value
//! references that leads back to where it started describes a type of infinite size,
//! so every field on such a chain is emitted through a `Box`.
//!
//! References inside a `Vec` are already behind a heap pointer and are left out of
//! the graph. Union markers embed their variants by value and take part in it.

use crate::oas::models::ResolvedType;
use std::collections::{BTreeMap, BTreeSet};

/// By-value references between generated types.
#[derive(Debug, Default, Clone)]
pub struct ReferenceGraph {
    dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl ReferenceGraph {
    /// Builds the graph of every named type in `types`.
    pub fn from_types(types: &[ResolvedType]) -> Self {
        let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for ty in types {
            let Some(name) = ty.type_name() else {
                continue;
            };
            dependencies
                .entry(name.to_string())
                .or_default()
                .extend(ty.inline_references().into_iter().map(str::to_string));
        }
        Self { dependencies }
    }

    /// Types `name` embeds directly.
    pub fn dependencies(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(name)
    }

    /// Whether `to` can be reached from `from` through at least one reference.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            let Some(deps) = self.dependencies.get(node) else {
                continue;
            };
            for dep in deps {
                if dep == to {
                    return true;
                }
                stack.push(dep.as_str());
            }
        }
        false
    }

    /// Whether the reference `owner -> target` lies on a cycle.
    pub fn closes_cycle(&self, owner: &str, target: &str) -> bool {
        owner == target || self.reaches(target, owner)
    }
}

/// Boxes every record or variant field whose reference lies on a cycle.
///
/// Returns the names of the types that changed, in `types` order.
pub fn box_cyclic_fields(types: &mut [ResolvedType]) -> Vec<String> {
    let graph = ReferenceGraph::from_types(types);
    let mut changed = Vec::new();

    for ty in types.iter_mut() {
        let (name, fields) = match ty {
            ResolvedType::Record(record) => (&record.name, &mut record.fields),
            ResolvedType::UnionVariant(variant) => (&variant.name, &mut variant.fields),
            _ => continue,
        };
        let mut touched = false;
        for field in fields.iter_mut() {
            let cyclic = field
                .inline_target()
                .is_some_and(|target| graph.closes_cycle(name, target));
            if cyclic && !field.boxed {
                field.boxed = true;
                touched = true;
            }
        }
        if touched {
            changed.push(name.clone());
        }
    }
    changed
}
