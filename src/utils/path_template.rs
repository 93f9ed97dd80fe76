use crate::errors::ToolError;
use serde_json::{Map, Value};
use url::Url;

/// Names of the `:name` placeholders in a path template, in order.
pub fn placeholders(template: &str) -> Vec<&str> {
    template
        .split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .collect()
}

fn segment_value(args: &Map<String, Value>, name: &str) -> Result<String, ToolError> {
    let raw = match args.get(name) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(num)) => num.to_string(),
        _ => String::new(),
    };
    if raw.is_empty() {
        return Err(ToolError::validation(format!(
            "Missing value for path parameter '{}'",
            name
        )));
    }
    if raw == "." || raw == ".." {
        return Err(ToolError::validation(format!(
            "Path parameter '{}' must be an identifier",
            name
        )));
    }
    Ok(raw)
}

/// Appends the template to the base URL, substituting every placeholder.
/// Values are pushed as single percent-encoded segments.
pub fn resolve_url(base: &Url, template: &str, args: &Map<String, Value>) -> Result<Url, ToolError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ToolError::validation(format!("Base URL cannot carry a path: {}", base))
        })?;
        segments.pop_if_empty();
        for segment in template.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some(name) => {
                    let value = segment_value(args, name)?;
                    segments.push(&value);
                }
                None => {
                    segments.push(segment);
                }
            }
        }
    }
    Ok(url)
}
