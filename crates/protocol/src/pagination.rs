use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Content shown when there is nothing to paginate.
pub const NO_CONTENT_PLACEHOLDER: &str = "(No docstring available)";

/// Position of one page inside a paginated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaginationInfo {
    /// Zero-based page index after clamping
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_lines: usize,
    pub has_next: bool,
    pub has_prev: bool,
    /// 1-based inclusive line range, e.g. `21-40 of 57`
    pub lines_range: String,
}

impl PaginationInfo {
    /// Metadata for a text that fits a single (possibly empty) page.
    #[must_use]
    pub fn single_page(page_size: usize, total_lines: usize) -> Self {
        let end = total_lines.min(page_size.max(1));
        let start = if end == 0 { 0 } else { 1 };
        Self {
            page: 0,
            page_size,
            total_pages: 1,
            total_lines,
            has_next: false,
            has_prev: false,
            lines_range: format!("{start}-{end} of {total_lines}"),
        }
    }
}

/// Metadata returned next to a rendered docstring page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocstringMetadata {
    pub target: String,

    /// Resolved kind (`module`, `class`, `function`, `attribute`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Module the entity was found in (absent for module targets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    pub pagination: PaginationInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocstringMetadata {
    /// Metadata describing a failed lookup.
    pub fn failed(target: impl Into<String>, page_size: usize, error: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: None,
            module: None,
            pagination: PaginationInfo::single_page(page_size, 0),
            error: Some(error.into()),
        }
    }
}
