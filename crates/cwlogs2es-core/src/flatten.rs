// Flattening of JSON-structured log messages
//
// Application logs often carry a whole JSON document in the message
// body. Rather than indexing that as one opaque string, every string
// leaf is lifted to a top-level dotted-path field so it can be queried
// directly.

use serde_json::{Map, Value};

/// Root segment prepended to every lifted field path.
pub const FLATTEN_PREFIX: &str = "json_log_data";

/// Expand a JSON-structured message into dotted-path fields on `doc`.
///
/// The message is parsed as JSON; anything that does not parse as an
/// object leaves `doc` untouched (plain-text log lines are the common
/// case, not an error). String leaves anywhere in the tree become
/// `<prefix>.<path>` fields, with object keys joined by `.` and array
/// elements addressed by their index. Non-string scalars (numbers,
/// booleans, null) never become fields; downstream index mappings expect
/// string-typed values. When at least one leaf was lifted, the original
/// `message` key is removed so a document never carries both forms.
pub fn flatten_message(doc: &mut Map<String, Value>, message: &str, prefix: &str) {
    let Ok(parsed) = serde_json::from_str::<Value>(message) else {
        return;
    };
    if !parsed.is_object() {
        return;
    }

    let mut fields = Vec::new();
    collect_string_leaves(&parsed, prefix, &mut fields);
    if fields.is_empty() {
        return;
    }

    doc.remove("message");
    for (path, value) in fields {
        doc.insert(path, Value::String(value));
    }
}

fn collect_string_leaves(value: &Value, path: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::String(s) => out.push((path.to_string(), s.clone())),
        Value::Object(map) => {
            for (key, child) in map {
                collect_string_leaves(child, &format!("{path}.{key}"), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_string_leaves(child, &format!("{path}.{index}"), out);
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}
