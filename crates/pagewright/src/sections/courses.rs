//! Course listing

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::render::RenderError;
use crate::schema::{FieldType, Schema};
use crate::section::Props;

pub const TYPE: &str = "courses";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CoursesProps {
    pub heading: Option<String>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    pub code: Option<String>,
    pub title: String,
    pub credits: Option<f64>,
    pub description: Option<String>,
}

pub fn schema() -> Schema {
    let course = crate::schema! {
        title: String,
        code?: String,
        credits?: Number,
        description?: String
    };
    Schema::builder()
        .optional("heading", FieldType::String)
        .optional(
            "courses",
            FieldType::Array(Box::new(FieldType::Object(Box::new(course)))),
        )
        .build()
}

pub fn render(props: &Props) -> Result<Node, RenderError> {
    let listing: CoursesProps = super::parse_props(props)?;

    let items = listing.courses.iter().map(|course| {
        let title = match &course.code {
            Some(code) => format!("{} {}", code, course.title),
            None => course.title.clone(),
        };
        Node::new("li")
            .child(Node::text("h3", title))
            .maybe_child(course.credits.map(|c| Node::text("span", format!("{} credits", c))))
            .maybe_child(course.description.as_ref().map(|d| Node::text("p", d)))
    });

    Ok(Node::new("section")
        .attr("class", "courses")
        .maybe_child(listing.heading.as_ref().map(|h| Node::text("h2", h)))
        .child(Node::new("ul").children(items)))
}
