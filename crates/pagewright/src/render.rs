//! Renderer dispatch
//!
//! Projects an ordered list of sections onto an ordered list of rendered
//! nodes. Output length and order always match the input: a section whose
//! type is not registered, or whose renderer rejects its props, becomes a
//! placeholder node instead of being dropped or aborting the page.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::node::Node;
use crate::registry::SectionRegistry;
use crate::section::Section;

/// Failure reported by a section renderer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        RenderError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RenderError {}

/// What a single section rendered to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderedContent {
    /// Output of the registered renderer
    Rendered { node: Node },

    /// No renderer registered for the section type
    Unsupported { label: String },

    /// The registered renderer rejected the section's props
    InvalidProps { reason: String },
}

/// One output entry per input section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    /// Stable output identity derived from the section key
    pub identity: String,
    pub section_type: String,
    #[serde(flatten)]
    pub content: RenderedContent,
}

impl RenderedNode {
    pub fn is_placeholder(&self) -> bool {
        !matches!(self.content, RenderedContent::Rendered { .. })
    }

    /// The rendered element, if the section rendered normally
    pub fn node(&self) -> Option<&Node> {
        match &self.content {
            RenderedContent::Rendered { node } => Some(node),
            _ => None,
        }
    }
}

/// Counts of each kind of output
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderSummary {
    pub rendered: usize,
    pub unsupported: usize,
    pub invalid: usize,
}

impl RenderSummary {
    pub fn of(nodes: &[RenderedNode]) -> Self {
        nodes.iter().fold(RenderSummary::default(), |mut acc, n| {
            match n.content {
                RenderedContent::Rendered { .. } => acc.rendered += 1,
                RenderedContent::Unsupported { .. } => acc.unsupported += 1,
                RenderedContent::InvalidProps { .. } => acc.invalid += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.rendered + self.unsupported + self.invalid
    }
}

/// Label used for sections with no registered renderer
pub fn unsupported_label(section_type: &str) -> String {
    format!("unsupported section type: {}", section_type)
}

/// Output identity for the section at `index`
///
/// Keyed identities survive reordering; the positional form is only a
/// fallback for sections that arrived without a key.
pub fn section_identity(section: &Section, index: usize) -> String {
    if section.key.is_empty() {
        format!("position:{}", index)
    } else {
        format!("section:{}", section.key)
    }
}

/// Dispatches sections to their registered renderers
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a SectionRegistry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a SectionRegistry) -> Self {
        Dispatcher { registry }
    }

    /// Render sections in order; an empty input renders nothing
    pub fn render(&self, sections: &[Section]) -> Vec<RenderedNode> {
        sections
            .iter()
            .enumerate()
            .map(|(index, section)| self.render_section(section, index))
            .collect()
    }

    /// Render a single section at its position
    pub fn render_section(&self, section: &Section, index: usize) -> RenderedNode {
        let identity = section_identity(section, index);
        let section_type = section.section_type.to_string();

        let content = match self.registry.resolve(&section_type) {
            Some(entry) => match entry.renderer().render(&section.props) {
                Ok(node) => RenderedContent::Rendered { node },
                Err(error) => {
                    warn!(
                        key = %section.key,
                        section_type = %section_type,
                        reason = %error,
                        "section renderer rejected props"
                    );
                    RenderedContent::InvalidProps {
                        reason: error.message,
                    }
                }
            },
            None => {
                warn!(
                    key = %section.key,
                    section_type = %section_type,
                    "unsupported section type, rendering placeholder"
                );
                RenderedContent::Unsupported {
                    label: unsupported_label(&section_type),
                }
            }
        };

        debug!(identity = %identity, "rendered section");
        RenderedNode {
            identity,
            section_type,
            content,
        }
    }
}

/// Render sections against a registry
pub fn render_sections(registry: &SectionRegistry, sections: &[Section]) -> Vec<RenderedNode> {
    Dispatcher::new(registry).render(sections)
}
