use crate::errors::ToolError;
use crate::models::{item_text_field, PaginatedList};
use crate::services::logger::Logger;
use crate::services::validation::compile_pattern;
use regex::Regex;
use serde_json::{Map, Value};

pub const URL_PATTERN_ARG: &str = "urlPattern";
pub const TITLE_PATTERN_ARG: &str = "titlePattern";

/// Decodes a list body and enforces the cursor invariant on the way out:
/// `nextCursor` is present exactly when `hasMore` is true.
pub fn normalize_page(
    logger: &Logger,
    tool: &str,
    body: Value,
) -> Result<PaginatedList<Value>, ToolError> {
    let mut page: PaginatedList<Value> = match serde_json::from_value(body.clone()) {
        Ok(page) => page,
        Err(err) => {
            return Err(ToolError::unknown(format!(
                "{} returned a body that is not a paginated list: {}",
                tool, err
            ))
            .with_details(body));
        }
    };

    page.next_cursor = page.next_cursor.filter(|cursor| !cursor.trim().is_empty());
    if !page.has_more {
        page.next_cursor = None;
    } else if page.next_cursor.is_none() {
        logger.warn(
            "List reported more pages without a cursor",
            Some(&serde_json::json!({ "tool": tool, "items": page.data.len() })),
        );
        page.has_more = false;
    }
    Ok(page)
}

/// Local URL/title filter for item searches. Both patterns must match when
/// both are given; an item lacking the tested field does not match.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
    url: Option<Regex>,
    title: Option<Regex>,
}

impl PatternFilter {
    pub fn from_args(args: &Map<String, Value>) -> Result<Self, ToolError> {
        let compile = |field: &str| -> Result<Option<Regex>, ToolError> {
            match args.get(field).and_then(|v| v.as_str()) {
                Some(raw) if !raw.is_empty() => compile_pattern(field, raw).map(Some),
                _ => Ok(None),
            }
        };
        Ok(Self {
            url: compile(URL_PATTERN_ARG)?,
            title: compile(TITLE_PATTERN_ARG)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.title.is_none()
    }

    pub fn matches(&self, item: &Value) -> bool {
        let check = |pattern: &Option<Regex>, field: &str| match pattern {
            None => true,
            Some(re) => item_text_field(item, field)
                .map(|text| re.is_match(text))
                .unwrap_or(false),
        };
        check(&self.url, "url") && check(&self.title, "title")
    }

    /// Keeps matching items in their original order.
    pub fn apply(&self, items: Vec<Value>) -> Vec<Value> {
        if self.is_empty() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}
