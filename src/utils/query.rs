use crate::mcp::catalog::{Endpoint, OperationKind};
use crate::utils::path_template::placeholders;
use serde_json::{Map, Value};
use std::collections::HashSet;
use url::Url;

/// Everything an operation sends besides its path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Splits validated arguments into query pairs or a JSON body. Path
/// placeholders and local-only arguments are never forwarded, and unset
/// fields are omitted rather than sent as null.
pub fn build_request_parts(endpoint: &Endpoint, args: &Map<String, Value>) -> RequestParts {
    let mut skip: HashSet<&str> = placeholders(&endpoint.path).into_iter().collect();
    skip.extend(endpoint.local_args.iter().map(String::as_str));

    let mut forwarded = Map::new();
    for (key, value) in args {
        if skip.contains(key.as_str()) || value.is_null() {
            continue;
        }
        forwarded.insert(key.clone(), value.clone());
    }

    let mut parts = RequestParts::default();
    if endpoint.method.carries_body() || endpoint.kind == OperationKind::Batch {
        parts.body = prune_nulls(&Value::Object(forwarded))
            .filter(|body| body.as_object().map(|m| !m.is_empty()).unwrap_or(true));
    } else {
        for (key, value) in &forwarded {
            flatten_query(key, value, &mut parts.query);
        }
    }
    parts
}

/// Serializes one argument into query pairs. Nested objects become dotted
/// keys (`metadata.team=growth`) and arrays repeat the key.
pub fn flatten_query(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::String(text) => {
            if !text.trim().is_empty() {
                out.push((key.to_string(), text.clone()));
            }
        }
        Value::Bool(flag) => out.push((key.to_string(), flag.to_string())),
        Value::Number(num) => out.push((key.to_string(), num.to_string())),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => {
                        out.push((key.to_string(), item.to_string()));
                    }
                    _ => flatten_query(key, item, out),
                }
            }
        }
        Value::Object(map) => {
            for (child, entry) in map {
                flatten_query(&format!("{}.{}", key, child), entry, out);
            }
        }
    }
}

/// Drops null members from objects at every depth. Returns `None` for a
/// bare null.
pub fn prune_nulls(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, entry) in map {
                if let Some(kept) = prune_nulls(entry) {
                    out.insert(key.clone(), kept);
                }
            }
            Some(Value::Object(out))
        }
        Value::Array(items) => Some(Value::Array(
            items.iter().map(|item| prune_nulls(item).unwrap_or(Value::Null)).collect(),
        )),
        _ => Some(value.clone()),
    }
}

pub fn append_query(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        return;
    }
    url.query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
}
