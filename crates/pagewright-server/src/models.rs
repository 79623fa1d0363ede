//! Request and response bodies

use pagewright::{Page, Props, RenderSummary, RenderedNode, RegistryEntry, Schema};
use serde::Serialize;

/// A registered section type as offered to editors
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTypeInfo {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub default_props: Props,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl From<&RegistryEntry> for SectionTypeInfo {
    fn from(entry: &RegistryEntry) -> Self {
        Self {
            section_type: entry.section_type.to_string(),
            label: entry.label.clone(),
            default_props: entry.default_props(),
            schema: entry.schema().cloned(),
        }
    }
}

/// A page rendered through the registry
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub page: Page,
    pub nodes: Vec<RenderedNode>,
    pub summary: RenderSummary,
}
