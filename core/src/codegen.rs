#![deny(missing_docs)]

//! # Code Generation
//!
//! Renders resolved types into Rust source units.
//!
//! Every unit is a standalone module file meant to live in a `models/` directory next
//! to its siblings; units reach each other through `use super::*;` and the generated
//! `mod.rs` index. Serde attributes carry the wire contract:
//! - every field has `#[serde(rename = "<wire>")]`,
//! - nullable or non-required fields are `Option<T>`,
//! - non-required fields get `#[serde(default)]` (required ones never do),
//! - deprecated fields and types get `#[deprecated]`.

use crate::error::{AppError, AppResult};
use crate::oas::models::{EnumType, Field, RecordType, UnionMarker, UnionVariant};
use crate::oas::naming::to_variant_ident;
use crate::oas::schema::{SchemaNode, SchemaShape};
use crate::oas::unions::DeserializationPlan;
use heck::ToShoutySnakeCase;
use ra_ap_edition::Edition;
use ra_ap_syntax::SourceFile;
use std::collections::HashSet;

const SERDE_IMPORT: &str = "use serde::{Deserialize, Serialize};";
const SIBLINGS_IMPORT: &str = "use super::*;";

/// Checks that generated code parses as Rust.
pub fn validate_source(code: &str) -> AppResult<()> {
    let parse = SourceFile::parse(code, Edition::Edition2021);
    if parse.errors().is_empty() {
        return Ok(());
    }
    let errs: Vec<String> = parse.errors().into_iter().map(|e| e.to_string()).collect();
    Err(AppError::General(format!(
        "Generated code failed to parse: {}",
        errs.join(", ")
    )))
}

/// Writes `text` as doc comment lines at `indent`.
pub fn doc_comment(text: Option<&str>, indent: &str) -> String {
    let mut code = String::new();
    if let Some(text) = text {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                code.push_str(&format!("{}///\n", indent));
            } else {
                code.push_str(&format!("{}/// {}\n", indent, line));
            }
        }
    }
    code
}

/// Comment block describing the schema a unit came from.
pub fn schema_metadata(key: &str, schema: &SchemaNode) -> String {
    let mut code = String::new();
    let (kind, format) = match &schema.shape {
        SchemaShape::Primitive { kind, format } => (kind.as_str(), format.as_deref()),
        _ => (schema.kind_label(), None),
    };

    code.push_str(&format!("// Schema: {}\n", key));
    code.push_str(&format!("// Type: {}\n", kind));
    code.push_str(&format!("// Format: {}\n", format.unwrap_or("N/A")));
    if let Some(desc) = &schema.meta.description {
        code.push_str(&format!("// Description: {}\n", desc.replace('\n', " ")));
    }
    match &schema.shape {
        SchemaShape::Enum(values) => {
            code.push_str("// Enum values:\n");
            for value in values {
                code.push_str(&format!("// - {}\n", value));
            }
        }
        SchemaShape::Array(Some(items)) => {
            code.push_str(&format!("// Items type: {}\n", items.kind_label()));
        }
        SchemaShape::Reference(target) => {
            code.push_str(&format!("// Reference: {}\n", target));
        }
        _ => {}
    }
    if let Some(default) = &schema.meta.default {
        code.push_str(&format!("// Default value: {}\n", default));
    }
    code.push_str(&format!("// Nullable: {}\n", schema.meta.nullable));
    code.push_str(&format!("// Deprecated: {}\n", schema.meta.deprecated));
    if let SchemaShape::Object {
        properties,
        required,
    } = &schema.shape
    {
        if !required.is_empty() {
            code.push_str("// Required properties:\n");
            for name in required {
                code.push_str(&format!("// - {}\n", name));
            }
        }
        if !properties.is_empty() {
            code.push_str("// Properties:\n");
            for (name, prop) in properties {
                code.push_str(&format!("// - {}: {}\n", name, prop.kind_label()));
            }
        }
    }
    code
}

fn unit_prelude(namespace: &str, imports: &[&str]) -> String {
    let mut code = format!("//! Generated from `{}`.\n", namespace);
    code.push_str("#![allow(unused_imports)]\n\n");
    for import in imports {
        code.push_str(import);
        code.push('\n');
    }
    code.push('\n');
    code
}

fn field_block(field: &Field) -> String {
    let mut code = doc_comment(field.description.as_deref(), "    ");
    if let Some(default) = &field.default {
        if field.description.is_some() {
            code.push_str("    ///\n");
        }
        code.push_str(&format!("    /// Default: `{}`\n", default));
    }
    if field.deprecated {
        code.push_str("    #[deprecated]\n");
    }

    let mut attrs = vec![format!("rename = {:?}", field.wire_name)];
    if !field.required {
        attrs.push("default".to_string());
        if !field.nullable {
            attrs.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
    }
    code.push_str(&format!("    #[serde({})]\n", attrs.join(", ")));
    code.push_str(&format!("    pub {}: {},\n", field.ident(), field.rust_type()));
    code
}

fn struct_body(name: &str, fields: &[Field]) -> String {
    let mut code = String::new();
    code.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    code.push_str(&format!("pub struct {} {{\n", name));
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&field_block(field));
    }
    code.push_str("}\n");
    code
}

/// Renders a record as a serde struct.
pub fn generate_record(record: &RecordType, metadata: Option<&str>) -> String {
    let mut code = unit_prelude(&record.namespace, &[SERDE_IMPORT, SIBLINGS_IMPORT]);
    if let Some(meta) = metadata {
        code.push_str(meta);
    }
    code.push_str(&doc_comment(record.description.as_deref(), ""));
    if record.deprecated {
        code.push_str("#[deprecated]\n");
    }
    code.push_str(&struct_body(&record.name, &record.fields));
    code
}

/// Renders an enum. Variant identifiers are derived from the raw values, which are
/// kept on the wire through `#[serde(rename)]`.
pub fn generate_enum(en: &EnumType, metadata: Option<&str>) -> String {
    let mut code = unit_prelude(&en.namespace, &[SERDE_IMPORT]);
    if let Some(meta) = metadata {
        code.push_str(meta);
    }
    code.push_str(&doc_comment(en.description.as_deref(), ""));
    code.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n");
    code.push_str(&format!("pub enum {} {{\n", en.name));

    let mut used = HashSet::new();
    for value in &en.values {
        let base = to_variant_ident(value);
        let mut ident = base.clone();
        let mut counter = 2;
        while !used.insert(ident.clone()) {
            ident = format!("{}{}", base, counter);
            counter += 1;
        }
        code.push_str(&format!("    #[serde(rename = {:?})]\n", value));
        code.push_str(&format!("    {},\n", ident));
    }

    code.push_str("}\n");
    code
}

/// Renders a union marker: an enum wrapping each variant type, plus `From` impls.
pub fn generate_union_marker(marker: &UnionMarker) -> String {
    let mut code = unit_prelude(&marker.namespace, &[SIBLINGS_IMPORT]);
    let mut variants: Vec<&str> = Vec::with_capacity(marker.variants.len());
    for name in &marker.variants {
        if !variants.contains(&name.as_str()) {
            variants.push(name);
        }
    }

    let listed: Vec<String> = variants.iter().map(|v| format!("[`{}`]", v)).collect();
    code.push_str(&format!("/// One of {}.\n", listed.join(", ")));
    code.push_str("///\n");
    code.push_str(&format!(
        "/// Decoded structurally by the impls of the `{}` unit.\n",
        codec_name(&marker.name)
    ));
    code.push_str("#[allow(non_camel_case_types)]\n");
    code.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    code.push_str(&format!("pub enum {} {{\n", marker.name));
    for variant in &variants {
        code.push_str(&format!("    {}({}),\n", variant, variant));
    }
    code.push_str("}\n");

    for variant in &variants {
        code.push('\n');
        code.push_str(&format!("impl From<{}> for {} {{\n", variant, marker.name));
        code.push_str(&format!("    fn from(value: {}) -> Self {{\n", variant));
        code.push_str(&format!("        {}::{}(value)\n", marker.name, variant));
        code.push_str("    }\n");
        code.push_str("}\n");
    }
    code
}

/// Renders one variant of a union as a serde struct.
pub fn generate_union_variant(variant: &UnionVariant) -> String {
    let mut code = unit_prelude(&variant.namespace, &[SERDE_IMPORT, SIBLINGS_IMPORT]);
    code.push_str(&doc_comment(variant.description.as_deref(), ""));
    if variant.description.is_some() {
        code.push_str("///\n");
    }
    code.push_str(&format!("/// Variant of [`{}`].\n", variant.base_name));
    code.push_str("#[allow(non_camel_case_types)]\n");
    code.push_str(&struct_body(&variant.name, &variant.fields));
    code
}

/// Unit name of the decoder of a union marker.
pub fn codec_name(marker: &str) -> String {
    format!("{}Codec", marker)
}

const PLAN_DESERIALIZE: &str = r#"impl<'de> Deserialize<'de> for __BASE__ {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PlanVisitor;

        impl<'de> Visitor<'de> for PlanVisitor {
            type Value = __BASE__;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an object matching one variant of __BASE__")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut selected: Option<usize> = None;
                let mut held: Vec<(String, serde_json::Value)> = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    let value = map.next_value::<serde_json::Value>()?;
                    if selected.is_none() {
                        selected = __TABLE__.iter().position(|(_, fields)| {
                            fields.iter().any(|(name, wire)| *name == key || *wire == key)
                        });
                    }
                    held.push((key, value));
                }

                let index = selected.ok_or_else(|| {
                    <A::Error as de::Error>::custom(
                        "Could not determine the variant of '__BASE__': no property matched any variant",
                    )
                })?;
                let (variant, fields) = __TABLE__[index];

                let mut object = serde_json::Map::new();
                for (key, value) in held {
                    let wire = fields
                        .iter()
                        .find(|(name, _)| *name == key)
                        .or_else(|| fields.iter().find(|(_, wire)| *wire == key))
                        .map(|(_, wire)| *wire)
                        .ok_or_else(|| {
                            <A::Error as de::Error>::custom(format!(
                                "Property '{}' not found in variant '{}' of '__BASE__'",
                                key, variant
                            ))
                        })?;
                    object.insert(wire.to_string(), value);
                }
                let value = serde_json::Value::Object(object);

                match index {
__ARMS__                    _ => Err(de::Error::custom("variant index out of range")),
                }
            }
        }

        deserializer.deserialize_map(PlanVisitor)
    }
}

impl Serialize for __BASE__ {
    fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(ser::Error::custom(
            "Not supported: serializing '__BASE__' is not supported",
        ))
    }
}
"#;

/// Renders a deserialization plan as `Deserialize`/`Serialize` impls for its marker.
pub fn generate_plan(plan: &DeserializationPlan, namespace: &str) -> String {
    let base = plan.union_name();
    let table = format!("{}_VARIANTS", base.to_shouty_snake_case());
    let mut code = unit_prelude(
        namespace,
        &[
            "use serde::de::{self, Deserializer, MapAccess, Visitor};",
            "use serde::ser::{self, Serializer};",
            SERDE_IMPORT,
            SIBLINGS_IMPORT,
        ],
    );

    code.push_str(&format!(
        "/// `(variant, [(field, wire name)])` for every variant of [`{}`], in declaration order.\n",
        base
    ));
    code.push_str(&format!("const {}: &[(&str, &[(&str, &str)])] = &[\n", table));
    for variant in plan.variants() {
        let fields: Vec<String> = variant
            .fields
            .iter()
            .map(|f| format!("({:?}, {:?})", f.name, f.wire))
            .collect();
        code.push_str(&format!(
            "    ({:?}, &[{}]),\n",
            variant.type_name,
            fields.join(", ")
        ));
    }
    code.push_str("];\n\n");

    let mut arms = String::new();
    for (index, variant) in plan.variants().iter().enumerate() {
        arms.push_str(&format!(
            "                    {} => serde_json::from_value(value)\n                        .map({}::{})\n                        .map_err(de::Error::custom),\n",
            index, base, variant.type_name
        ));
    }

    code.push_str(
        &PLAN_DESERIALIZE
            .replace("__BASE__", base)
            .replace("__TABLE__", &table)
            .replace("__ARMS__", &arms),
    );
    code
}

/// Renders a `mod.rs` declaring and re-exporting every module.
///
/// `modules` are file stems, distinct as [`module_stems`](crate::oas::naming::module_stems)
/// assigns them.
pub fn generate_module_index<'a>(modules: impl IntoIterator<Item = &'a str>) -> String {
    let mut code = String::from("#![allow(unused_imports)]\n\n");
    let modules: Vec<&str> = modules.into_iter().collect();
    for module in &modules {
        code.push_str(&format!("pub mod {};\n", module));
    }
    code.push('\n');
    for module in &modules {
        code.push_str(&format!("pub use {}::*;\n", module));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::{Primitive, ResolvedType};
    use crate::oas::unions::{FieldKey, VariantFields};
    use serde_json::json;

    fn field(wire: &str, required: bool, nullable: bool) -> Field {
        Field {
            name: crate::oas::naming::title_case(wire),
            wire_name: wire.into(),
            ty: ResolvedType::Primitive(Primitive::String),
            required,
            nullable,
            deprecated: false,
            description: None,
            default: None,
            boxed: false,
        }
    }

    fn record(fields: Vec<Field>) -> RecordType {
        RecordType {
            name: "User".into(),
            namespace: "TestApiClientV1.Models".into(),
            fields,
            description: Some("A user.".into()),
            deprecated: false,
        }
    }

    #[test]
    fn test_required_and_nullable_combinations() {
        let code = generate_record(
            &record(vec![
                field("a", true, false),
                field("b", true, true),
                field("c", false, false),
                field("d", false, true),
            ]),
            None,
        );
        assert!(code.contains("    #[serde(rename = \"a\")]\n    pub a: String,"));
        assert!(code.contains("    #[serde(rename = \"b\")]\n    pub b: Option<String>,"));
        assert!(code.contains(
            "    #[serde(rename = \"c\", default, skip_serializing_if = \"Option::is_none\")]\n    pub c: Option<String>,"
        ));
        assert!(code.contains("    #[serde(rename = \"d\", default)]\n    pub d: Option<String>,"));
        assert!(code.contains("/// A user.\n#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\npub struct User {"));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_field_docs_default_and_deprecation() {
        let mut f = field("displayName", false, false);
        f.description = Some("Shown in the UI.\nMay be empty.".into());
        f.default = Some(json!("anon"));
        f.deprecated = true;
        let code = generate_record(&record(vec![f]), None);
        assert!(code.contains("    /// Shown in the UI.\n    /// May be empty.\n    ///\n    /// Default: `\"anon\"`\n    #[deprecated]\n"));
        assert!(code.contains("pub display_name: Option<String>,"));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_wire_names_are_escaped() {
        let code = generate_record(&record(vec![field("say \"hi\"", true, false)]), None);
        assert!(code.contains(r#"#[serde(rename = "say \"hi\"")]"#));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_enum_keeps_raw_values() {
        let en = EnumType {
            name: "Status".into(),
            namespace: "X.Models".into(),
            values: vec!["in-progress".into(), "1".into(), "in_progress".into()],
            description: None,
        };
        let code = generate_enum(&en, None);
        assert!(code.contains("    #[serde(rename = \"in-progress\")]\n    InProgress,"));
        assert!(code.contains("    #[serde(rename = \"1\")]\n    Value1,"));
        assert!(code.contains("    #[serde(rename = \"in_progress\")]\n    InProgress2,"));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_union_marker_and_variant() {
        let marker = UnionMarker {
            name: "ChoiceOneOf".into(),
            namespace: "X.Models".into(),
            variants: vec!["choiceA".into(), "choiceB".into()],
        };
        let code = generate_union_marker(&marker);
        assert!(code.contains("pub enum ChoiceOneOf {\n    choiceA(choiceA),\n    choiceB(choiceB),\n}"));
        assert!(code.contains("impl From<choiceB> for ChoiceOneOf {"));
        validate_source(&code).unwrap();

        let variant = UnionVariant {
            name: "choiceA".into(),
            namespace: "X.Models".into(),
            base_name: "ChoiceOneOf".into(),
            fields: vec![field("x", false, false)],
            description: None,
        };
        let code = generate_union_variant(&variant);
        assert!(code.contains("/// Variant of [`ChoiceOneOf`].\n#[allow(non_camel_case_types)]\n"));
        assert!(code.contains("pub struct choiceA {"));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_plan_renders_table_and_arms() {
        let plan = DeserializationPlan::new(
            "ChoiceOneOf",
            vec![
                VariantFields {
                    type_name: "choiceA".into(),
                    fields: vec![FieldKey {
                        name: "x".into(),
                        wire: "x".into(),
                    }],
                },
                VariantFields {
                    type_name: "choiceB".into(),
                    fields: vec![],
                },
            ],
        );
        let code = generate_plan(&plan, "X.Models");
        assert!(code.contains("const CHOICE_ONE_OF_VARIANTS: &[(&str, &[(&str, &str)])] = &[\n    (\"choiceA\", &[(\"x\", \"x\")]),\n    (\"choiceB\", &[]),\n];"));
        assert!(code.contains("impl<'de> Deserialize<'de> for ChoiceOneOf {"));
        assert!(code.contains("                    1 => serde_json::from_value(value)\n                        .map(ChoiceOneOf::choiceB)"));
        assert!(code.contains("impl Serialize for ChoiceOneOf {"));
        assert!(!code.contains("__"));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_metadata_block() {
        let schema: SchemaNode = serde_yaml::from_str(
            "type: object\ndescription: \"two\\nlines\"\nrequired: [id]\nproperties:\n  id: { type: string }\n",
        )
        .unwrap();
        let meta = schema_metadata("User", &schema);
        assert!(meta.starts_with("// Schema: User\n// Type: object\n// Format: N/A\n// Description: two lines\n"));
        assert!(meta.contains("// Required properties:\n// - id\n"));
        assert!(meta.contains("// Properties:\n// - id: string\n"));
    }

    #[test]
    fn test_module_index() {
        let code = generate_module_index(["user", "choice_one_of", "choice_a"]);
        assert!(code.contains("pub mod user;\npub mod choice_one_of;\npub mod choice_a;\n"));
        assert!(code.contains("pub use choice_a::*;"));
        validate_source(&code).unwrap();
    }

    #[test]
    fn test_validate_source_rejects_garbage() {
        assert!(validate_source("pub struct {").is_err());
    }
}
