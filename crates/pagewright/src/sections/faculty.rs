//! Faculty directory grid

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::render::RenderError;
use crate::schema::{FieldType, Schema};
use crate::section::Props;

pub const TYPE: &str = "faculty";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FacultyProps {
    pub heading: Option<String>,
    pub members: Vec<FacultyMember>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FacultyMember {
    pub name: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub photo: Option<String>,
}

pub fn schema() -> Schema {
    let member = crate::schema! {
        name: String,
        role?: String,
        department?: String,
        photo?: String
    };
    Schema::builder()
        .optional("heading", FieldType::String)
        .optional(
            "members",
            FieldType::Array(Box::new(FieldType::Object(Box::new(member)))),
        )
        .build()
}

pub fn render(props: &Props) -> Result<Node, RenderError> {
    let faculty: FacultyProps = super::parse_props(props)?;

    let cards = faculty.members.iter().map(|member| {
        let mut card = Node::new("article").attr("class", "faculty-card");
        if let Some(photo) = &member.photo {
            card = card.child(Node::new("img").attr("src", photo).attr("alt", &member.name));
        }
        let subtitle = match (&member.role, &member.department) {
            (Some(role), Some(dept)) => Some(format!("{}, {}", role, dept)),
            (Some(one), None) | (None, Some(one)) => Some(one.clone()),
            (None, None) => None,
        };
        card.child(Node::text("h3", &member.name))
            .maybe_child(subtitle.map(|s| Node::text("p", s)))
    });

    Ok(Node::new("section")
        .attr("class", "faculty")
        .maybe_child(faculty.heading.as_ref().map(|h| Node::text("h2", h)))
        .children(cards))
}
