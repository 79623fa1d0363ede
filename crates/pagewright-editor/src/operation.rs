//! Serializable edit operations
//!
//! The wire form of the session's mutation calls, so a batch of edits can
//! arrive as JSON and be replayed against a session in order.

use pagewright::{Props, SectionKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditOperation {
    /// Add a section of a registered type; appends when `at` is omitted
    Add {
        #[serde(rename = "type")]
        section_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at: Option<usize>,
        /// Initial props, replacing the type's default props
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Props>,
    },

    Remove { key: SectionKey },

    /// Move a section; out-of-range targets are clamped
    Move { key: SectionKey, to: usize },

    UpdateProps { key: SectionKey, props: Props },
}

impl EditOperation {
    pub fn name(&self) -> &'static str {
        match self {
            EditOperation::Add { .. } => "add",
            EditOperation::Remove { .. } => "remove",
            EditOperation::Move { .. } => "move",
            EditOperation::UpdateProps { .. } => "updateProps",
        }
    }
}

/// What applying an operation produced
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Added(SectionKey),
    Removed(pagewright::Section),
    Moved(usize),
    Updated,
}
