use crate::errors::ToolError;
use crate::mcp::catalog::ToolDef;
use crate::mcp::envelope::Envelope;
use crate::services::logger::Logger;
use crate::services::pagination::{normalize_page, PatternFilter};
use serde_json::{Map, Value};

/// One fetched page reduced by the local URL/title patterns. `hasMore` and
/// `nextCursor` still describe the unfiltered server page, so a caller that
/// wants more matches must follow the cursor and filter again.
pub fn search_envelope(
    logger: &Logger,
    tool: &str,
    body: Value,
    filter: &PatternFilter,
) -> Result<Envelope, ToolError> {
    let page = normalize_page(logger, tool, body)?;
    let fetched = page.data.len();
    let matching = filter.apply(page.data);

    let mut data = Map::new();
    data.insert("matchingItems".to_string(), Value::from(matching.len()));
    data.insert("fetchedItems".to_string(), Value::from(fetched));
    data.insert("items".to_string(), Value::Array(matching));
    data.insert("hasMore".to_string(), Value::Bool(page.has_more));
    if let Some(cursor) = page.next_cursor {
        data.insert("nextCursor".to_string(), Value::String(cursor));
    }
    Ok(Envelope::ok(Value::Object(data)))
}

/// Batch calls report how many identifiers were submitted. The response is
/// passed through untouched; per-item outcomes are not inspected.
pub fn batch_envelope(tool: &ToolDef, args: &Map<String, Value>, body: Value) -> Envelope {
    let requested = tool
        .endpoint
        .count_arg
        .as_deref()
        .and_then(|arg| args.get(arg))
        .and_then(|v| v.as_array())
        .map(|ids| ids.len())
        .unwrap_or(0);
    Envelope::ok(body).with_field("requestedCount", Value::from(requested))
}
