//! Typed reads from a scenario section with a default fallback.
//!
//! Every helper returns the default when the key is absent. A present but
//! malformed value is an error, never silently replaced by the default.

use indexmap::IndexMap;
use toml::{Table, Value};

use crate::config::{ConfigNode, render};
use crate::error::{Result, ScenarioError};
use crate::settings::Invoker;

/// The string at `key`, or `default`.
///
/// # Errors
/// Fails when the value is an array or a table.
pub fn string(
    node: &impl ConfigNode,
    key: &str,
    default: Option<String>,
) -> Result<Option<String>> {
    Ok(node.get_string(key)?.or(default))
}

/// The non-negative integer at `key`, or `default`.
///
/// Accepts a TOML integer or a string holding a base-10 number.
///
/// # Errors
/// Fails on negative, out-of-range, or non-numeric values.
pub fn integer(node: &impl ConfigNode, key: &str, default: u32) -> Result<u32> {
    let Some(value) = node.get_value(key) else {
        return Ok(default);
    };
    let invalid = |reason: String| ScenarioError::InvalidInteger {
        key: key.to_owned(),
        value: render(value),
        reason,
    };
    match value {
        Value::Integer(i) => u32::try_from(*i).map_err(|e| invalid(e.to_string())),
        Value::String(s) => s.parse::<u32>().map_err(|e| invalid(e.to_string())),
        other => Err(invalid(format!("expected an integer, found {}", other.type_str()))),
    }
}

/// The list of strings at `key`, or `default`.
///
/// An array maps each element to its string form. A scalar with a non-empty
/// string form is a one-element list; an empty scalar (or a table) falls
/// back to `default`.
#[must_use]
pub fn strings(node: &impl ConfigNode, key: &str, default: &[String]) -> Vec<String> {
    match node.get_value(key) {
        Some(Value::Array(items)) => items.iter().map(render).collect(),
        Some(Value::Table(_)) | None => default.to_vec(),
        Some(scalar) => {
            let s = render(scalar);
            if s.is_empty() { default.to_vec() } else { vec![s] }
        }
    }
}

/// The string-to-string mapping at `key`, or a copy of `default`.
///
/// Nested tables flatten into dotted keys, so `org.gradle.caching = true`
/// yields `("org.gradle.caching", "true")`. Entries keep document order.
///
/// # Errors
/// Fails when the value is not a table.
pub fn map(
    node: &impl ConfigNode,
    key: &str,
    default: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>> {
    let Some(table) = node.get_object(key)? else {
        return Ok(default.clone());
    };
    let mut flat = IndexMap::new();
    flatten(None, table, &mut flat);
    Ok(flat)
}

fn flatten(prefix: Option<&str>, table: &Table, out: &mut IndexMap<String, String>) {
    for (k, v) in table {
        let path = prefix.map_or_else(|| k.clone(), |p| format!("{p}.{k}"));
        match v {
            Value::Table(inner) => flatten(Some(&path), inner, out),
            leaf => {
                out.insert(path, render(leaf));
            }
        }
    }
}

/// The invoker at `key`, or `default`.
///
/// # Errors
/// Fails on any value other than `"no-daemon"` or `"tooling-api"`.
pub fn invoker(node: &impl ConfigNode, key: &str, default: Invoker) -> Result<Invoker> {
    let Some(value) = node.get_value(key) else {
        return Ok(default);
    };
    match render(value).as_str() {
        "no-daemon" => Ok(Invoker::NoDaemon),
        "tooling-api" => Ok(Invoker::ToolingApi),
        other => Err(ScenarioError::InvalidInvoker {
            key: key.to_owned(),
            value: other.to_owned(),
        }),
    }
}
