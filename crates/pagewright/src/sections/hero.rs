//! Hero banner: headline, optional subtitle and call to action

use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::render::RenderError;
use crate::schema::{FieldType, Schema, SchemaField};
use crate::section::Props;

pub const TYPE: &str = "hero";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroProps {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

pub fn schema() -> Schema {
    Schema::builder()
        .with(
            SchemaField::new("title", FieldType::String, true)
                .with_label("Headline")
                .with_default(serde_json::json!("Your headline here")),
        )
        .optional("subtitle", FieldType::String)
        .optional("ctaLabel", FieldType::String)
        .optional("ctaHref", FieldType::String)
        .optional("backgroundImage", FieldType::String)
        .build()
}

pub fn render(props: &Props) -> Result<Node, RenderError> {
    let hero: HeroProps = super::parse_props(props)?;

    let mut section = Node::new("section").attr("class", "hero");
    if let Some(image) = &hero.background_image {
        section = section.attr("data-background", image);
    }

    let cta = match (&hero.cta_label, &hero.cta_href) {
        (Some(label), Some(href)) => Some(Node::text("a", label).attr("href", href)),
        (Some(label), None) => Some(Node::text("span", label)),
        _ => None,
    };

    Ok(section
        .child(Node::text("h1", &hero.title))
        .maybe_child(hero.subtitle.as_ref().map(|s| Node::text("p", s)))
        .maybe_child(cta))
}
