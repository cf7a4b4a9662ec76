
mod invalid;
mod valid;

/// Convert a [`Node`](crate::Node) to a `serde_json::Value`, used to check the lazy
/// navigation API against the `serde_json` oracle for randomly generated documents.
pub(crate) fn node_to_json(node: &crate::Node) -> serde_json::Value {
    use crate::Kind;
    use serde_json::{Map, Number, Value};

    match node.kind() {
        Kind::Invalid | Kind::Null => Value::Null,
        Kind::Bool => Value::Bool(node.as_bool().unwrap()),
        Kind::String => Value::String(node.as_str().unwrap().into_owned()),
        Kind::Number => {
            let raw = std::str::from_utf8(node.raw()).unwrap();
            if raw.contains('.') || raw.contains('e') || raw.contains('E') {
                Value::Number(Number::from_f64(node.as_f64().unwrap()).unwrap())
            } else if let Ok(i) = node.as_i64() {
                Value::Number(i.into())
            } else {
                Value::Number(node.as_u64().unwrap().into())
            }
        }
        Kind::Array => {
            let mut out = Vec::new();
            node.array_for_each(|_, child| {
                out.push(node_to_json(&child));
                true
            });
            Value::Array(out)
        }
        Kind::Object => {
            let mut out = Map::new();
            node.for_each(|k, child| {
                out.insert(k.to_string(), node_to_json(&child));
                true
            });
            Value::Object(out)
        }
    }
}
