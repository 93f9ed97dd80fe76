use crate::errors::ToolError;
use crate::models::ResourceGroup;
use crate::utils::path_template::placeholders;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Patch)
    }
}

/// Post-processing applied to the response of an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    #[default]
    Resource,
    List,
    SearchItems,
    Batch,
    ExportList,
    ExportGet,
}

impl OperationKind {
    pub fn is_paginated(self) -> bool {
        matches!(
            self,
            OperationKind::List | OperationKind::SearchItems | OperationKind::ExportList
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub kind: OperationKind,
    /// Arguments consumed locally and never sent to the server.
    #[serde(default, rename = "localArgs", skip_serializing_if = "Vec::is_empty")]
    pub local_args: Vec<String>,
    /// Array argument whose length is reported back by batch operations.
    #[serde(default, rename = "countArg", skip_serializing_if = "Option::is_none")]
    pub count_arg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub group: ResourceGroup,
    pub endpoint: Endpoint,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDef {
    pub fn required_fields(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.input_schema
            .get("properties")
            .and_then(|v| v.as_object())
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Shape advertised to callers: name, description and argument schema.
    pub fn listing(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
        })
    }
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn tool_names() -> Vec<String> {
    TOOL_CATALOG.iter().map(|tool| tool.name.clone()).collect()
}

/// Structural checks over the embedded catalog. Every path placeholder must
/// be a required string argument so the resolver can never be left with an
/// unresolved segment.
pub fn validate_catalog(catalog: &[ToolDef]) -> Result<(), ToolError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for tool in catalog {
        if !seen.insert(tool.name.as_str()) {
            problems.push(format!("{}: duplicate operation name", tool.name));
        }
        if tool.input_schema.get("type").and_then(|v| v.as_str()) != Some("object") {
            problems.push(format!("{}: inputSchema must be an object schema", tool.name));
        }
        if !tool.endpoint.path.starts_with('/') {
            problems.push(format!("{}: path must start with '/'", tool.name));
        }

        let required = tool.required_fields();
        let properties = tool.property_names();
        for name in placeholders(&tool.endpoint.path) {
            if !required.contains(&name) {
                problems.push(format!(
                    "{}: path placeholder '{}' is not a required argument",
                    tool.name, name
                ));
                continue;
            }
            let prop_type = tool
                .input_schema
                .get("properties")
                .and_then(|p| p.get(name))
                .and_then(|p| p.get("type"))
                .and_then(|t| t.as_str());
            if prop_type != Some("string") {
                problems.push(format!(
                    "{}: path placeholder '{}' must be a string argument",
                    tool.name, name
                ));
            }
        }
        for local in &tool.endpoint.local_args {
            if !properties.contains(&local.as_str()) {
                problems.push(format!(
                    "{}: local argument '{}' is not declared",
                    tool.name, local
                ));
            }
        }
        match (&tool.endpoint.kind, &tool.endpoint.count_arg) {
            (OperationKind::Batch, Some(arg)) if required.contains(&arg.as_str()) => {}
            (OperationKind::Batch, _) => problems.push(format!(
                "{}: batch operations need a required countArg",
                tool.name
            )),
            (_, Some(_)) => problems.push(format!(
                "{}: countArg is only valid on batch operations",
                tool.name
            )),
            _ => {}
        }
    }

    if problems.is_empty() {
        return Ok(());
    }
    Err(ToolError::unknown("Operation catalog is inconsistent")
        .with_details(serde_json::json!({ "problems": problems })))
}
