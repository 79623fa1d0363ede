//! Free text block, split into paragraphs on blank lines

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::render::RenderError;
use crate::schema::{FieldType, Schema, SchemaField};
use crate::section::Props;

pub const TYPE: &str = "richText";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RichTextProps {
    pub heading: Option<String>,
    pub body: String,
}

pub fn schema() -> Schema {
    Schema::builder()
        .optional("heading", FieldType::String)
        .with(SchemaField::new("body", FieldType::String, true).with_default(serde_json::json!("")))
        .build()
}

pub fn render(props: &Props) -> Result<Node, RenderError> {
    let text: RichTextProps = super::parse_props(props)?;

    let paragraphs = text
        .body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| Node::text("p", p));

    Ok(Node::new("section")
        .attr("class", "rich-text")
        .maybe_child(text.heading.as_ref().map(|h| Node::text("h2", h)))
        .children(paragraphs))
}
