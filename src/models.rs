//! Request-scoped views over remote resources. Values are decoded from one
//! response body and dropped once the envelope is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceGroup {
    Websets,
    Items,
    Searches,
    Enrichments,
    Imports,
    Monitors,
    Webhooks,
    Events,
    Exports,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> PaginatedList<T> {
    /// True when `next_cursor` is present iff `has_more` is set.
    pub fn is_consistent(&self) -> bool {
        self.has_more == self.next_cursor.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Export {
    #[serde(default)]
    pub id: Option<String>,
    pub status: ExportStatus,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl Export {
    pub fn download_ready(&self) -> bool {
        self.status == ExportStatus::Completed
            && self
                .download_url
                .as_deref()
                .map(|url| !url.trim().is_empty())
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStatusCounts {
    pub completed: usize,
    pub pending: usize,
    pub processing: usize,
    pub failed: usize,
}

impl ExportStatusCounts {
    pub fn record(&mut self, status: ExportStatus) {
        match status {
            ExportStatus::Completed => self.completed += 1,
            ExportStatus::Pending => self.pending += 1,
            ExportStatus::Processing => self.processing += 1,
            ExportStatus::Failed => self.failed += 1,
            ExportStatus::Other => {}
        }
    }
}

/// Item fields the local pattern filter reads. Items carry their URL and
/// title either at the top level or under `properties`.
pub fn item_text_field<'a>(item: &'a Value, field: &str) -> Option<&'a str> {
    item.get(field)
        .and_then(|v| v.as_str())
        .or_else(|| {
            item.get("properties")
                .and_then(|p| p.get(field))
                .and_then(|v| v.as_str())
        })
}
