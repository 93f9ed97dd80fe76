use crate::constants::limits::{MAX_PATTERN_LENGTH, MAX_SCHEMA_ERRORS, MAX_SUGGESTIONS};
use crate::errors::ToolError;
use crate::mcp::catalog::ToolDef;
use crate::utils::suggest::suggest;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::JSONSchema;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Compiled argument schemas, one per operation. Checking arguments never
/// touches the network.
pub struct ArgumentValidator {
    schemas: HashMap<String, JSONSchema>,
}

impl ArgumentValidator {
    pub fn compile(catalog: &[ToolDef]) -> Result<Self, ToolError> {
        let mut schemas = HashMap::new();
        let mut problems = Vec::new();
        for tool in catalog {
            match JSONSchema::compile(&tool.input_schema) {
                Ok(schema) => {
                    schemas.insert(tool.name.clone(), schema);
                }
                Err(err) => problems.push(format!("{}: {}", tool.name, err)),
            }
        }
        if !problems.is_empty() {
            return Err(ToolError::unknown("Operation schemas failed to compile")
                .with_details(serde_json::json!({ "problems": problems })));
        }
        Ok(Self { schemas })
    }

    /// Returns the argument object on success. Absent or null arguments are
    /// treated as an empty object, and top-level null members as unset.
    pub fn validate(&self, tool: &ToolDef, args: Value) -> Result<Map<String, Value>, ToolError> {
        let args = match args {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(_, value)| !value.is_null())
                    .collect(),
            ),
            other => {
                return Err(ToolError::validation(format!(
                    "Invalid arguments for {}\n- (root): expected object, got {}",
                    tool.name,
                    json_type_name(&other)
                )));
            }
        };

        let schema = self.schemas.get(&tool.name).ok_or_else(|| {
            ToolError::unknown(format!("No compiled schema for operation '{}'", tool.name))
        })?;
        if let Err(errors) = schema.validate(&args) {
            let (message, hint) = format_schema_errors(&tool.name, &tool.input_schema, errors);
            let mut err = ToolError::validation(message);
            if let Some(hint) = hint {
                err = err.with_hint(hint);
            }
            return Err(err);
        }

        for local in &tool.endpoint.local_args {
            if let Some(raw) = args.get(local).and_then(|v| v.as_str()) {
                compile_pattern(local, raw)?;
            }
        }

        match args {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Compiles a caller-supplied pattern. Oversized or malformed patterns are
/// caller errors.
pub fn compile_pattern(field: &str, raw: &str) -> Result<Regex, ToolError> {
    if raw.len() > MAX_PATTERN_LENGTH {
        return Err(ToolError::validation(format!(
            "{} must be at most {} bytes",
            field, MAX_PATTERN_LENGTH
        )));
    }
    Regex::new(raw).map_err(|err| {
        ToolError::validation(format!("{} is not a valid regular expression", field))
            .with_details(serde_json::json!({ "pattern": raw, "reason": err.to_string() }))
    })
}

fn format_schema_errors(
    tool_name: &str,
    schema: &Value,
    errors: jsonschema::ErrorIterator,
) -> (String, Option<String>) {
    let mut rendered = Vec::new();
    let mut did_you_means = Vec::new();

    for err in errors.take(MAX_SCHEMA_ERRORS) {
        let instance_path = if err.instance_path.to_string().is_empty() {
            "(root)".to_string()
        } else {
            err.instance_path.to_string()
        };
        match &err.kind {
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let props = schema_properties_near(schema, &err.schema_path.to_string());
                for unknown in unexpected {
                    rendered.push(format!("{}: unknown field '{}'", instance_path, unknown));
                    let suggestions = suggest(unknown, &props, MAX_SUGGESTIONS);
                    if !suggestions.is_empty() {
                        did_you_means.push(format!(
                            "field '{}': {}",
                            unknown,
                            suggestions.join(", ")
                        ));
                    }
                }
            }
            ValidationErrorKind::Enum { options } => {
                let allowed: Vec<String> = options
                    .as_array()
                    .map(|arr| arr.iter().map(display_value).collect())
                    .unwrap_or_default();
                let received = display_value(&err.instance);
                rendered.push(format!(
                    "{}: invalid value '{}', expected one of {}",
                    instance_path,
                    received,
                    allowed.join(", ")
                ));
                let suggestions = suggest(&received, &allowed, MAX_SUGGESTIONS);
                if !suggestions.is_empty() {
                    did_you_means.push(format!("{}: {}", instance_path, suggestions.join(", ")));
                }
            }
            ValidationErrorKind::Required { property } => {
                rendered.push(format!(
                    "{}: missing required field '{}'",
                    instance_path,
                    display_value(property)
                ));
            }
            ValidationErrorKind::Type { kind } => {
                rendered.push(format!(
                    "{}: expected {}, got {}",
                    instance_path,
                    format_type_kind(kind),
                    json_type_name(&err.instance)
                ));
            }
            _ => rendered.push(format!("{}: {}", instance_path, err)),
        }
    }

    let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
    lines.extend(rendered.iter().map(|line| format!("- {}", line)));
    let hint = if did_you_means.is_empty() {
        None
    } else {
        Some(format!("Did you mean: {}", did_you_means.join(" | ")))
    };
    (lines.join("\n"), hint)
}

fn display_value(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn format_type_kind(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

/// Property names of the object schema that owns the failing keyword.
/// `schema_path` points at the keyword itself, so the last segment is
/// dropped before walking.
fn schema_properties_near(schema: &Value, schema_path: &str) -> Vec<String> {
    let segments: Vec<&str> = schema_path.split('/').filter(|s| !s.is_empty()).collect();
    let parent = &segments[..segments.len().saturating_sub(1)];
    let mut current = schema;
    for segment in parent {
        let next = match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(arr) => segment.parse::<usize>().ok().and_then(|idx| arr.get(idx)),
            _ => None,
        };
        match next {
            Some(node) => current = node,
            None => return Vec::new(),
        }
    }
    current
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}
