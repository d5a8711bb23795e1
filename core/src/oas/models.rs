#![deny(missing_docs)]

//! # Resolved Types
//!
//! The output of schema resolution. The emitters only ever see these structures,
//! never raw schema nodes.

use crate::oas::naming::to_snake_ident;
use serde_json::Value;

/// Built-in scalar types of the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `integer` / `int32`
    Int32,
    /// `integer` + `int64`
    Int64,
    /// `number` / `float`
    Float32,
    /// `number` + `double`
    Float64,
    /// `boolean`
    Bool,
    /// `string`
    String,
    /// `string` + `date-time`
    DateTime,
    /// `string` + `date`
    Date,
    /// `string` + `time`
    Time,
    /// `string` + `uuid`
    Uuid,
    /// `string` + `binary`
    Binary,
    /// `string` + `uri`
    Uri,
    /// Open marker for untyped values.
    Untyped,
}

impl Primitive {
    /// The Rust type written into generated code.
    pub fn rust_type(&self) -> &'static str {
        match self {
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::Float32 => "f32",
            Primitive::Float64 => "f64",
            Primitive::Bool => "bool",
            Primitive::String => "String",
            Primitive::DateTime => "chrono::DateTime<chrono::FixedOffset>",
            Primitive::Date => "chrono::NaiveDate",
            Primitive::Time => "chrono::NaiveTime",
            Primitive::Uuid => "uuid::Uuid",
            Primitive::Binary => "Vec<u8>",
            Primitive::Uri => "url::Url",
            Primitive::Untyped => "serde_json::Value",
        }
    }
}

/// A generated object type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    /// Type name.
    pub name: String,
    /// Owning namespace.
    pub namespace: String,
    /// Fields in declared order.
    pub fields: Vec<Field>,
    /// Schema description.
    pub description: Option<String>,
    /// Schema-level deprecation.
    pub deprecated: bool,
}

/// A generated enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    /// Type name.
    pub name: String,
    /// Owning namespace.
    pub namespace: String,
    /// Raw values in declared order.
    pub values: Vec<String>,
    /// Schema description.
    pub description: Option<String>,
}

/// The common type of a `oneOf` group.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionMarker {
    /// `<Owner>OneOf`.
    pub name: String,
    /// Owning namespace.
    pub namespace: String,
    /// Variant type names in declared order.
    pub variants: Vec<String>,
}

/// One concrete shape of a `oneOf` group.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    /// Variant type name, `sanitize(owner) + sanitize(title)`.
    pub name: String,
    /// Owning namespace.
    pub namespace: String,
    /// The marker this variant belongs to.
    pub base_name: String,
    /// Fields in declared order.
    pub fields: Vec<Field>,
    /// Variant description.
    pub description: Option<String>,
}

/// The result of resolving one schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    /// A built-in scalar.
    Primitive(Primitive),
    /// A named type generated elsewhere (or forward reference to a pending one).
    Reference(String),
    /// A generated object type.
    Record(RecordType),
    /// A generated enumeration.
    Enum(EnumType),
    /// The marker of a `oneOf` group.
    UnionMarker(UnionMarker),
    /// A `oneOf` variant.
    UnionVariant(UnionVariant),
    /// A list; not named on its own.
    Array(Box<ResolvedType>),
}

impl ResolvedType {
    /// The Rust type expression for this type.
    pub fn rust_type(&self) -> String {
        match self {
            ResolvedType::Primitive(p) => p.rust_type().to_string(),
            ResolvedType::Reference(name) => name.clone(),
            ResolvedType::Record(r) => r.name.clone(),
            ResolvedType::Enum(e) => e.name.clone(),
            ResolvedType::UnionMarker(m) => m.name.clone(),
            ResolvedType::UnionVariant(v) => v.name.clone(),
            ResolvedType::Array(inner) => format!("Vec<{}>", inner.rust_type()),
        }
    }

    /// Name of a type that gets its own source unit.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ResolvedType::Record(r) => Some(&r.name),
            ResolvedType::Enum(e) => Some(&e.name),
            ResolvedType::UnionMarker(m) => Some(&m.name),
            ResolvedType::UnionVariant(v) => Some(&v.name),
            _ => None,
        }
    }

    /// Fields of records and union variants.
    pub fn fields(&self) -> &[Field] {
        match self {
            ResolvedType::Record(r) => &r.fields,
            ResolvedType::UnionVariant(v) => &v.fields,
            _ => &[],
        }
    }

    /// Type names this type holds by value: field references outside a `Vec`, and
    /// the variants of a union marker.
    pub fn inline_references(&self) -> Vec<&str> {
        match self {
            ResolvedType::Record(_) | ResolvedType::UnionVariant(_) => self
                .fields()
                .iter()
                .filter_map(Field::inline_target)
                .collect(),
            ResolvedType::UnionMarker(m) => m.variants.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Every type name this type points at, recursing through arrays.
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            ResolvedType::Reference(name) => vec![name.as_str()],
            ResolvedType::Array(inner) => inner.referenced_names(),
            ResolvedType::Record(_) | ResolvedType::UnionVariant(_) => self
                .fields()
                .iter()
                .flat_map(|f| f.ty.referenced_names())
                .collect(),
            ResolvedType::UnionMarker(m) => m.variants.iter().map(String::as_str).collect(),
            ResolvedType::Primitive(_) | ResolvedType::Enum(_) => Vec::new(),
        }
    }
}

/// A record or variant member.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// In-code identifier, title cased (`DisplayName`, `UserProperty`).
    pub name: String,
    /// Name on the wire.
    pub wire_name: String,
    /// Resolved type of the value.
    pub ty: ResolvedType,
    /// Listed in the owner's `required` set.
    pub required: bool,
    /// Marked nullable.
    pub nullable: bool,
    /// Marked deprecated.
    pub deprecated: bool,
    /// Description.
    pub description: Option<String>,
    /// Declared default.
    pub default: Option<Value>,
    /// Held through a `Box` because the field closes a reference cycle.
    pub boxed: bool,
}

impl Field {
    /// The snake_case Rust identifier, keyword-escaped.
    pub fn ident(&self) -> String {
        to_snake_ident(&self.name)
    }

    /// The identifier without a raw prefix, as used in lookup tables.
    pub fn plain_ident(&self) -> String {
        let ident = self.ident();
        ident.strip_prefix("r#").map(str::to_string).unwrap_or(ident)
    }

    /// The type this field embeds directly, if it is a named reference.
    pub fn inline_target(&self) -> Option<&str> {
        match &self.ty {
            ResolvedType::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Whether the generated member is an `Option`.
    pub fn is_optional(&self) -> bool {
        self.nullable || !self.required
    }

    /// Full Rust type of the member.
    pub fn rust_type(&self) -> String {
        let mut inner = self.ty.rust_type();
        if self.boxed {
            inner = format!("Box<{}>", inner);
        }
        if self.is_optional() {
            format!("Option<{}>", inner)
        } else {
            inner
        }
    }
}
