//! Student testimonials

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::render::RenderError;
use crate::schema::{FieldType, Schema};
use crate::section::Props;

pub const TYPE: &str = "testimonials";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsProps {
    pub heading: Option<String>,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    pub program: Option<String>,
}

pub fn schema() -> Schema {
    let item = crate::schema! {
        quote: String,
        author: String,
        program?: String
    };
    Schema::builder()
        .optional("heading", FieldType::String)
        .optional(
            "items",
            FieldType::Array(Box::new(FieldType::Object(Box::new(item)))),
        )
        .build()
}

pub fn render(props: &Props) -> Result<Node, RenderError> {
    let testimonials: TestimonialsProps = super::parse_props(props)?;

    let quotes = testimonials.items.iter().map(|item| {
        let attribution = match &item.program {
            Some(program) => format!("{} ({})", item.author, program),
            None => item.author.clone(),
        };
        Node::new("figure")
            .child(Node::text("blockquote", &item.quote))
            .child(Node::text("figcaption", attribution))
    });

    Ok(Node::new("section")
        .attr("class", "testimonials")
        .maybe_child(testimonials.heading.as_ref().map(|h| Node::text("h2", h)))
        .children(quotes))
}
