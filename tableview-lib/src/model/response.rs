//! Response bodies of the list and submit endpoints.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::RowRecord;

/// Body of `GET {base}list/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    /// Rows of the requested page.
    #[serde(default)]
    pub rows: Vec<RowRecord>,
    /// Page the server actually served.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Number of pages at the requested page size.
    #[serde(default)]
    pub total_pages: u32,
    /// Number of rows across all pages, when the server reports it.
    #[serde(default)]
    pub total_rows: Option<u64>,
}

fn first_page() -> u32 {
    1
}

/// Structured validation errors returned by a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormErrorPayload {
    /// Errors not attributable to a single field.
    #[serde(rename = "global-errors", default)]
    pub global_errors: Vec<String>,
    /// Errors keyed by field name.
    #[serde(rename = "field-errors", default)]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FormErrorPayload {
    /// Returns `true` if the payload carries no message at all.
    pub fn is_empty(&self) -> bool {
        self.global_errors.is_empty() && self.field_errors.values().all(Vec::is_empty)
    }
}

/// Body of `POST {base}add/` and `POST {base}update/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Whether the server accepted the submission.
    #[serde(default)]
    pub success: bool,
    /// Replacement form markup.
    #[serde(default)]
    pub content: Option<String>,
    /// Validation errors to render on the current form.
    #[serde(default)]
    pub errors: Option<FormErrorPayload>,
}
