//! Pagewright composes pages out of ordered, independently configurable
//! sections and renders them through a registry of section renderers.
//!
//! ## Core concepts
//!
//! - A **Page** is an ordered list of **Sections**; order is render order.
//! - A **Section** has a stable key, an open-ended type tag and a JSON props bag.
//! - The **SectionRegistry** maps a type tag to a renderer, a props schema
//!   and a default-props template.
//! - The **Dispatcher** renders sections in order. Unknown types become
//!   placeholders; nothing is dropped and one bad section never aborts a page.
//!
//! ```rust
//! use pagewright::{Page, Section, builtin_registry, render_sections};
//! use serde_json::json;
//!
//! let page = Page::builder("home")
//!     .title("Home")
//!     .section(Section::from_value("s1", "hero", json!({"title": "Welcome"})).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let registry = builtin_registry().unwrap();
//! let nodes = render_sections(&registry, &page.sections);
//! assert_eq!(nodes.len(), 1);
//! ```

pub mod error;
pub mod macros;
pub mod node;
pub mod page;
pub mod registry;
pub mod render;
pub mod schema;
pub mod section;
pub mod sections;

// Re-export core types
pub use error::{DataError, PagewrightError, RegistryError, Result, ValidationError};
pub use node::Node;
pub use page::{Page, PageBuilder, PageId};
pub use registry::{RegistryBuilder, RegistryEntry, SectionRegistry, SectionRenderer};
pub use render::{
    Dispatcher, RenderError, RenderSummary, RenderedContent, RenderedNode, render_sections,
};
pub use schema::{FieldType, Schema, SchemaBuilder, SchemaField, SchemaViolation};
pub use section::{Props, Section, SectionKey, SectionType, props_from_value};
pub use sections::{KnownSection, builtin_registry, register_builtins};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
