use crate::errors::ToolError;
use crate::mcp::envelope::Envelope;
use crate::models::{Export, ExportStatus, ExportStatusCounts};
use crate::services::logger::Logger;
use crate::services::pagination::normalize_page;
use serde_json::Value;

pub fn list_envelope(logger: &Logger, tool: &str, body: Value) -> Result<Envelope, ToolError> {
    let page = normalize_page(logger, tool, body)?;
    let mut summary = ExportStatusCounts::default();
    for export in &page.data {
        let status = export
            .get("status")
            .cloned()
            .and_then(|raw| serde_json::from_value::<ExportStatus>(raw).ok());
        if let Some(status) = status {
            summary.record(status);
        }
    }
    Ok(Envelope::ok(serde_json::to_value(&page)?)
        .with_field("summary", serde_json::to_value(summary)?))
}

/// `downloadReady` is false for bodies that do not decode as an export.
pub fn get_envelope(body: Value) -> Envelope {
    let ready = serde_json::from_value::<Export>(body.clone())
        .map(|export| export.download_ready())
        .unwrap_or(false);
    Envelope::ok(body).with_field("downloadReady", Value::Bool(ready))
}
