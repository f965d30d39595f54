//! Raw document handling: normalization, shape checks and typed decode.
//!
//! ```text
//! raw JSON → prune nulls → shape check → typed decode → item checks → PortfolioConfig
//! ```
//!
//! Documents from the content store are normalized first so absent
//! collections become empty arrays and asset defaults are injected.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::{ConfigError, Origin, Violation};
use super::model::{Assets, PortfolioConfig};

/// Collections every document must carry as arrays.
pub const REQUIRED_COLLECTIONS: [&str; 4] = ["caseStudies", "makerProjects", "writing", "resources"];

/// Collections filled with `[]` when a content store document omits them.
const STORE_COLLECTIONS: [&str; 6] = [
    "navigation",
    "caseStudies",
    "makerProjects",
    "writing",
    "resources",
    "testimonials",
];

/// Sections filled with `{}` when a content store document omits them.
const STORE_SECTIONS: [&str; 4] = ["personal", "seo", "social", "skills"];

/// Why a document was turned away.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Shape or item violations, in document order
    Invalid(Vec<Violation>),
    /// Typed decode failed
    Malformed(String),
}

impl Rejection {
    /// Collapse into the error surfaced by the resolver (first violation wins).
    pub fn into_error(self, origin: Origin) -> ConfigError {
        match self {
            Rejection::Invalid(violations) => match violations.into_iter().next() {
                Some(violation) => ConfigError::validation(origin, violation),
                None => ConfigError::Malformed {
                    origin,
                    message: "document rejected without a reason".to_string(),
                },
            },
            Rejection::Malformed(message) => ConfigError::Malformed { origin, message },
        }
    }
}

/// True for `null` and `{}`; the content store treats both as "no document".
pub fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Remove `null` object members recursively so field defaults apply.
pub fn prune_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(prune_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(prune_nulls),
        _ => {}
    }
}

/// Bring a content store document into the `PortfolioConfig` shape.
///
/// Absent collections become `[]`, absent sections `{}`, and the asset
/// defaults (never stored in the CMS) are always injected.
pub fn normalize_store_document(mut raw: Value) -> Value {
    prune_nulls(&mut raw);

    let mut map = match raw {
        Value::Object(map) => map,
        other => return other,
    };

    for key in STORE_SECTIONS {
        map.entry(key).or_insert_with(|| Value::Object(Map::new()));
    }
    for key in STORE_COLLECTIONS {
        map.entry(key).or_insert_with(|| Value::Array(Vec::new()));
    }

    let assets = serde_json::to_value(Assets::default()).unwrap_or(Value::Null);
    map.insert("assets".to_string(), assets);

    Value::Object(map)
}

/// Minimal shape check on a raw document.
pub fn check_shape(value: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();

    let root = match value.as_object() {
        Some(root) => root,
        None => {
            violations.push(Violation::new("$", "document must be a JSON object"));
            return violations;
        }
    };

    match root.get("personal") {
        None => violations.push(Violation::new("personal.name", "is required")),
        Some(Value::Object(personal)) => match personal.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => {}
            Some(Value::String(_)) => {
                violations.push(Violation::new("personal.name", "must not be empty"))
            }
            Some(_) => violations.push(Violation::new("personal.name", "must be a string")),
            None => violations.push(Violation::new("personal.name", "is required")),
        },
        Some(_) => violations.push(Violation::new("personal", "must be an object")),
    }

    for key in REQUIRED_COLLECTIONS {
        match root.get(key) {
            Some(Value::Array(_)) => {}
            Some(_) => violations.push(Violation::new(key, "must be an array")),
            None => violations.push(Violation::new(key, "is required and must be an array")),
        }
    }

    violations
}

/// Item-level invariants on a decoded document: unique non-empty ids and a
/// title on every gated item.
pub fn check_items(config: &PortfolioConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_ids(
        "caseStudies",
        config.case_studies.iter().map(|s| s.id.as_str()),
        &mut violations,
    );
    check_titles(
        "caseStudies",
        config.case_studies.iter().map(|s| s.release.title()),
        &mut violations,
    );

    check_ids(
        "makerProjects",
        config.maker_projects.iter().map(|p| p.id.as_str()),
        &mut violations,
    );
    check_titles(
        "makerProjects",
        config.maker_projects.iter().map(|p| p.release.title()),
        &mut violations,
    );

    check_titles("writing", config.writing.iter().map(|a| a.title()), &mut violations);
    check_titles("resources", config.resources.iter().map(|r| r.title()), &mut violations);

    violations
}

fn check_ids<'a>(
    collection: &str,
    ids: impl Iterator<Item = &'a str>,
    violations: &mut Vec<Violation>,
) {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, id) in ids.enumerate() {
        let field = format!("{collection}[{index}].id");
        if id.trim().is_empty() {
            violations.push(Violation::new(field, "must be a non-empty string"));
            continue;
        }
        if let Some(first) = seen.get(id) {
            violations.push(Violation::new(
                field,
                format!("duplicates id `{id}` already used by {collection}[{first}]"),
            ));
            continue;
        }
        seen.insert(id, index);
    }
}

fn check_titles<'a>(
    collection: &str,
    titles: impl Iterator<Item = &'a str>,
    violations: &mut Vec<Violation>,
) {
    for (index, title) in titles.enumerate() {
        if title.trim().is_empty() {
            violations.push(Violation::new(
                format!("{collection}[{index}].title"),
                "must be a non-empty string",
            ));
        }
    }
}

/// Run every check and the typed decode, reporting all violations found.
pub fn inspect(mut value: Value) -> Result<PortfolioConfig, Rejection> {
    prune_nulls(&mut value);

    let violations = check_shape(&value);
    if !violations.is_empty() {
        return Err(Rejection::Invalid(violations));
    }

    let config: PortfolioConfig =
        serde_json::from_value(value).map_err(|e| Rejection::Malformed(e.to_string()))?;

    let violations = check_items(&config);
    if !violations.is_empty() {
        return Err(Rejection::Invalid(violations));
    }

    Ok(config)
}

/// Decode a raw document into a validated `PortfolioConfig`.
pub fn decode(value: Value, origin: Origin) -> Result<PortfolioConfig, ConfigError> {
    inspect(value).map_err(|rejection| rejection.into_error(origin))
}
