//! Milestone timeline

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::render::RenderError;
use crate::schema::{FieldType, Schema};
use crate::section::Props;

pub const TYPE: &str = "timeline";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineProps {
    pub heading: Option<String>,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEvent {
    /// Free-form label such as a year or "Fall 2024"
    pub date: String,
    pub title: String,
    pub description: Option<String>,
}

pub fn schema() -> Schema {
    let event = crate::schema! {
        date: String,
        title: String,
        description?: String
    };
    Schema::builder()
        .optional("heading", FieldType::String)
        .optional(
            "events",
            FieldType::Array(Box::new(FieldType::Object(Box::new(event)))),
        )
        .build()
}

pub fn render(props: &Props) -> Result<Node, RenderError> {
    let timeline: TimelineProps = super::parse_props(props)?;

    let events = timeline.events.iter().map(|event| {
        Node::new("li")
            .child(Node::text("time", &event.date))
            .child(Node::text("h3", &event.title))
            .maybe_child(event.description.as_ref().map(|d| Node::text("p", d)))
    });

    Ok(Node::new("section")
        .attr("class", "timeline")
        .maybe_child(timeline.heading.as_ref().map(|h| Node::text("h2", h)))
        .child(Node::new("ol").children(events)))
}
