//! Built-in section types
//!
//! Each module owns a typed props struct, a props schema and a renderer.
//! Typed props are lenient: every field has a default, so older or partial
//! content still renders; only values of the wrong JSON type are rejected.

pub mod courses;
pub mod faculty;
pub mod hero;
pub mod rich_text;
pub mod testimonials;
pub mod timeline;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use courses::{Course, CoursesProps};
pub use faculty::{FacultyMember, FacultyProps};
pub use hero::HeroProps;
pub use rich_text::RichTextProps;
pub use testimonials::{Testimonial, TestimonialsProps};
pub use timeline::{TimelineEvent, TimelineProps};

use crate::error::{DataError, PagewrightError, RegistryError, Result};
use crate::registry::{RegistryBuilder, RegistryEntry, SectionRegistry};
use crate::render::RenderError;
use crate::section::{Props, Section, SectionType};

/// Deserialize a props bag into its typed shape
pub(crate) fn parse_props<T: DeserializeOwned>(props: &Props) -> std::result::Result<T, RenderError> {
    serde_json::from_value(serde_json::Value::Object(props.clone()))
        .map_err(|e| RenderError::new(e.to_string()))
}

/// Strongly typed view of a section
///
/// Types this build does not know stay as an opaque bag.
#[derive(Debug, Clone, PartialEq)]
pub enum KnownSection {
    Hero(HeroProps),
    Courses(CoursesProps),
    Faculty(FacultyProps),
    Testimonials(TestimonialsProps),
    Timeline(TimelineProps),
    RichText(RichTextProps),
    Opaque {
        section_type: SectionType,
        props: Props,
    },
}

impl KnownSection {
    /// Classify a section by its type tag
    ///
    /// Fails only when the type is known and its props have the wrong shape.
    pub fn from_section(section: &Section) -> Result<Self> {
        let typed = |reason: RenderError| {
            PagewrightError::Data(DataError::Deserialization {
                reason: format!("{} props: {}", section.section_type, reason),
            })
        };
        let props = &section.props;
        Ok(match section.section_type.as_str() {
            hero::TYPE => KnownSection::Hero(parse_props(props).map_err(typed)?),
            courses::TYPE => KnownSection::Courses(parse_props(props).map_err(typed)?),
            faculty::TYPE => KnownSection::Faculty(parse_props(props).map_err(typed)?),
            testimonials::TYPE => KnownSection::Testimonials(parse_props(props).map_err(typed)?),
            timeline::TYPE => KnownSection::Timeline(parse_props(props).map_err(typed)?),
            rich_text::TYPE => KnownSection::RichText(parse_props(props).map_err(typed)?),
            _ => KnownSection::Opaque {
                section_type: section.section_type.clone(),
                props: props.clone(),
            },
        })
    }

    pub fn section_type(&self) -> SectionType {
        match self {
            KnownSection::Hero(_) => hero::TYPE.into(),
            KnownSection::Courses(_) => courses::TYPE.into(),
            KnownSection::Faculty(_) => faculty::TYPE.into(),
            KnownSection::Testimonials(_) => testimonials::TYPE.into(),
            KnownSection::Timeline(_) => timeline::TYPE.into(),
            KnownSection::RichText(_) => rich_text::TYPE.into(),
            KnownSection::Opaque { section_type, .. } => section_type.clone(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, KnownSection::Opaque { .. })
    }

    /// Serialize back into a props bag
    pub fn to_props(&self) -> Result<Props> {
        match self {
            KnownSection::Hero(p) => to_props(p),
            KnownSection::Courses(p) => to_props(p),
            KnownSection::Faculty(p) => to_props(p),
            KnownSection::Testimonials(p) => to_props(p),
            KnownSection::Timeline(p) => to_props(p),
            KnownSection::RichText(p) => to_props(p),
            KnownSection::Opaque { props, .. } => Ok(props.clone()),
        }
    }

    /// Build a section with a freshly minted key
    pub fn into_section(self) -> Result<Section> {
        let props = self.to_props()?;
        Ok(Section::with_minted_key(self.section_type(), props))
    }
}

fn to_props<T: Serialize>(value: &T) -> Result<Props> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(PagewrightError::Data(DataError::not_an_object(&other))),
    }
}

/// Register every built-in section type
pub fn register_builtins(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(
            RegistryEntry::new(hero::TYPE, hero::render)
                .with_label("Hero banner")
                .with_schema(hero::schema()),
        )
        .register(
            RegistryEntry::new(courses::TYPE, courses::render)
                .with_label("Course list")
                .with_schema(courses::schema()),
        )
        .register(
            RegistryEntry::new(faculty::TYPE, faculty::render)
                .with_label("Faculty directory")
                .with_schema(faculty::schema()),
        )
        .register(
            RegistryEntry::new(testimonials::TYPE, testimonials::render)
                .with_label("Testimonials")
                .with_schema(testimonials::schema()),
        )
        .register(
            RegistryEntry::new(timeline::TYPE, timeline::render)
                .with_label("Timeline")
                .with_schema(timeline::schema()),
        )
        .register(
            RegistryEntry::new(rich_text::TYPE, rich_text::render)
                .with_label("Rich text")
                .with_schema(rich_text::schema()),
        )
}

/// Registry with all built-in section types
pub fn builtin_registry() -> std::result::Result<SectionRegistry, RegistryError> {
    register_builtins(SectionRegistry::builder()).build()
}
