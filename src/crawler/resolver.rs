//! Attribute resolution from detail payloads
//!
//! Detail responses carry ad attributes in up to three places: two side
//! collections of `{id, value}` parameter entries (`params` and
//! `parameters`, independently populated by the gateway) and the primary
//! `ad` object itself. Resolution scans the collections in order and falls
//! back to the primary object; malformed entries are skipped, absence
//! yields an empty string. Pure function, no I/O.

use serde_json::Value;

/// Resolves one named attribute from a detail payload
///
/// # Arguments
///
/// * `primary` - The primary ad object
/// * `params` - First parameter collection, scanned first
/// * `parameters` - Second parameter collection, scanned next
/// * `key` - The attribute key to resolve
///
/// # Returns
///
/// The first matching entry's value, the primary object's field as a last
/// resort, or an empty string when the key is absent everywhere.
pub fn resolve_field(primary: &Value, params: &[Value], parameters: &[Value], key: &str) -> String {
    for collection in [params, parameters] {
        for entry in collection {
            // Entries without an object shape or an id are skipped, not errors
            let id = match entry.get("id").and_then(Value::as_str) {
                Some(id) => id,
                None => continue,
            };

            if id == key {
                return value_to_text(entry.get("value"));
            }
        }
    }

    value_to_text(primary.get(key))
}

/// Renders a JSON value as plain attribute text
///
/// Strings are taken verbatim, numbers as their decimal form; anything
/// else (null, arrays, objects, absence) becomes empty.
fn value_to_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
