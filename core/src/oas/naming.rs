#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helper functions for deriving type, field, method and file names from OpenAPI keys.
//!
//! Every emitter derives names through these functions so that a schema referenced from
//! a model and from a client method always ends up with the same type name.

use heck::ToSnakeCase;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Fallback type name for a missing or empty key.
pub const DEFAULT_CLASS_NAME: &str = "object";

/// Suffix appended to a field whose identifier equals its declaring type's name.
pub const SELF_COLLISION_SUFFIX: &str = "Property";

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield", "gen",
];

/// Keywords that cannot be used as raw identifiers either.
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Reduces a raw key (schema key, `$ref` pointer, path segment) to a bare identifier.
///
/// Takes the last `/` segment, then the last `.` segment of that, and replaces
/// `- . { } space` with `_`. Empty or missing keys become [`DEFAULT_CLASS_NAME`].
pub fn sanitize_key(key: Option<&str>) -> String {
    let key = match key {
        Some(k) if !k.is_empty() => k,
        _ => return DEFAULT_CLASS_NAME.to_string(),
    };

    let tail = key.rsplit('/').next().unwrap_or(key);
    let tail = tail.rsplit('.').next().unwrap_or(tail);

    tail.chars()
        .map(|c| match c {
            '-' | '.' | '{' | '}' | ' ' => '_',
            other => other,
        })
        .collect()
}

/// Title-cases an identifier.
///
/// Separators (`space`, `_`, `-`) are dropped and the character following one is
/// upper-cased when it is lower case. Other characters are kept as they are.
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut capitalize = true;
    for c in input.chars() {
        if matches!(c, ' ' | '_' | '-') {
            capitalize = true;
            continue;
        }
        if capitalize && c.is_lowercase() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        capitalize = false;
    }
    result
}

/// Lower-cases the first character, leaving the rest untouched.
pub fn first_char_to_lower(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Memoized `TitleCase(sanitize_key(key))`.
///
/// Keys are compared by exact string equality. The cache is owned by whoever drives a
/// generation run, never shared between runs.
#[derive(Debug, Default, Clone)]
pub struct ClassNameCache {
    cache: HashMap<String, String>,
}

impl ClassNameCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the type name for a raw key.
    pub fn class_name(&mut self, key: Option<&str>) -> String {
        let Some(key) = key.filter(|k| !k.is_empty()) else {
            return title_case(DEFAULT_CLASS_NAME);
        };
        if let Some(hit) = self.cache.get(key) {
            return hit.clone();
        }
        let derived = title_case(&sanitize_key(Some(key)));
        self.cache.insert(key.to_string(), derived.clone());
        derived
    }

    /// Number of memoized keys.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Derives the method name stem from a URL template.
///
/// Uses the last segment, or the previous segment plus the last one when the previous
/// segment is not a template (`{...}`). `{ } . -` become spaces and the result is trimmed.
///
/// e.g. `/User/{userId}` -> `userId`, `/api/quiz/list` -> `quiz list`
pub fn method_name_from_path(path: &str) -> String {
    if path.is_empty() {
        return DEFAULT_CLASS_NAME.to_string();
    }

    let last_dot_tail = |s: &str| s.rsplit('.').next().unwrap_or(s).to_string();

    let last_slash = path.rfind('/');
    let raw = match last_slash {
        Some(last) if last > 0 => {
            let prev = path[..last].rfind('/');
            let before_last = prev.map(|p| &path[p + 1..last]);
            match (prev, before_last) {
                (Some(p), Some(segment)) if p > 0 && !segment.contains('{') => {
                    format!(
                        "{} {}",
                        last_dot_tail(segment),
                        last_dot_tail(&path[last + 1..])
                    )
                }
                _ => path[last + 1..].to_string(),
            }
        }
        Some(last) => path[last + 1..].to_string(),
        None => path.to_string(),
    };

    raw.chars()
        .map(|c| match c {
            '{' | '}' | '.' | '-' => ' ',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Converts any name into a valid snake_case Rust identifier.
///
/// Keywords are escaped as raw identifiers (`type` -> `r#type`), names starting with a
/// digit are prefixed with `_`.
pub fn to_snake_ident(name: &str) -> String {
    let mut ident = name.to_snake_case();
    if ident.is_empty() {
        return "value".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    escape_keyword(ident)
}

/// The snake_case file stem for a generated unit.
pub fn module_file_name(type_name: &str) -> String {
    let stem = type_name.to_snake_case();
    if stem.is_empty() {
        return DEFAULT_CLASS_NAME.to_string();
    }
    if RUST_KEYWORDS.contains(&stem.as_str()) || NON_RAW_KEYWORDS.contains(&stem.as_str()) {
        return format!("{}_", stem);
    }
    stem
}

/// Assigns each unit a distinct file stem, in order.
///
/// Distinct type names can share a snake_case stem (`HTTPStatus` and `HttpStatus`,
/// `ChoiceA` and `choiceA`). The first unit keeps its [`module_file_name`], later ones
/// get the first free numeric suffix starting at 2.
pub fn module_stems<'a>(names: impl IntoIterator<Item = &'a str>) -> IndexMap<String, String> {
    let mut used = HashSet::new();
    let mut stems = IndexMap::new();
    for name in names {
        if stems.contains_key(name) {
            continue;
        }
        let base = module_file_name(name);
        let mut stem = base.clone();
        let mut counter = 2;
        while !used.insert(stem.clone()) {
            stem = format!("{}{}", base, counter);
            counter += 1;
        }
        stems.insert(name.to_string(), stem);
    }
    stems
}

/// Turns an arbitrary enum value into a PascalCase variant identifier.
///
/// Non alphanumeric characters act as word boundaries; values that would start with a
/// digit get a `Value` prefix.
pub fn to_variant_ident(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let ident = title_case(&spaced);
    if ident.is_empty() {
        return "Empty".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("Value{}", ident);
    }
    if ident == "Self" {
        return "SelfValue".to_string();
    }
    ident
}

fn escape_keyword(ident: String) -> String {
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        return format!("{}_", ident);
    }
    if RUST_KEYWORDS.contains(&ident.as_str()) {
        return format!("r#{}", ident);
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key(Some("#/components/schemas/User")), "User");
        assert_eq!(sanitize_key(Some("My.Namespace.Thing")), "Thing");
        assert_eq!(sanitize_key(Some("user-profile read")), "user_profile_read");
        assert_eq!(sanitize_key(Some("{id}")), "_id_");
        assert_eq!(sanitize_key(Some("")), "object");
        assert_eq!(sanitize_key(None), "object");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("user_profile"), "UserProfile");
        assert_eq!(title_case("KL Quiz"), "KLQuiz");
        assert_eq!(title_case("displayName"), "DisplayName");
        assert_eq!(title_case("a-b_c d"), "ABCD");
        assert_eq!(title_case("_id_"), "Id");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_first_char_to_lower() {
        assert_eq!(first_char_to_lower("UserProfile"), "userProfile");
        assert_eq!(first_char_to_lower(""), "");
    }

    #[test]
    fn test_class_name_cache_is_idempotent() {
        let mut cache = ClassNameCache::new();
        let keys = [
            "#/components/schemas/user-read.model",
            "Quiz",
            "a b",
            "x.y/z{w}",
        ];
        for key in keys {
            let first = cache.class_name(Some(key));
            let second = cache.class_name(Some(key));
            assert_eq!(first, second);
        }
        assert_eq!(cache.len(), keys.len());
        assert_eq!(cache.class_name(Some("#/components/schemas/user-read.model")), "Model");
        assert_eq!(cache.class_name(None), "Object");
    }

    #[test]
    fn test_method_name_from_path() {
        assert_eq!(method_name_from_path("/User/{userId}"), "userId");
        assert_eq!(method_name_from_path("/User/login"), "login");
        assert_eq!(method_name_from_path("/api/quiz/list"), "quiz list");
        assert_eq!(method_name_from_path("/User/{userId}/quizzes"), "quizzes");
        assert_eq!(method_name_from_path("/users"), "users");
        assert_eq!(method_name_from_path("/api/v1.items/get-all"), "items get all");
        assert_eq!(method_name_from_path(""), "object");
    }

    #[test]
    fn test_snake_ident() {
        assert_eq!(to_snake_ident("DisplayName"), "display_name");
        assert_eq!(to_snake_ident("type"), "r#type");
        assert_eq!(to_snake_ident("Self"), "self_");
        assert_eq!(to_snake_ident("2fa"), "_2fa");
        assert_eq!(to_snake_ident("UserProperty"), "user_property");
    }

    #[test]
    fn test_variant_ident() {
        assert_eq!(to_variant_ident("in-progress"), "InProgress");
        assert_eq!(to_variant_ident("ACTIVE"), "ACTIVE");
        assert_eq!(to_variant_ident("1"), "Value1");
        assert_eq!(to_variant_ident(""), "Empty");
    }

    #[test]
    fn test_module_file_name() {
        assert_eq!(module_file_name("UserProfileReadModel"), "user_profile_read_model");
        assert_eq!(module_file_name("ChoiceOneOf"), "choice_one_of");
    }

    #[test]
    fn test_module_stems_never_clash() {
        let stems = module_stems(["HTTPStatus", "User", "HttpStatus", "ChoiceA", "choiceA", "User"]);
        let values: Vec<&str> = stems.values().map(String::as_str).collect();
        assert_eq!(values, ["http_status", "user", "http_status2", "choice_a", "choice_a2"]);
        assert_eq!(stems["HttpStatus"], "http_status2");
    }
}
