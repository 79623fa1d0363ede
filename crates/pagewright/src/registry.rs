//! Section registry: maps a section type to its renderer and props rules
//!
//! The registry is built once from static configuration and is read-only
//! afterwards. Lookup is an exact, case-sensitive match on the type string.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{RegistryError, ValidationError};
use crate::node::Node;
use crate::render::RenderError;
use crate::schema::Schema;
use crate::section::{Props, SectionType};

/// Render capability for one section type
///
/// Implementations are supplied by presentational code and are opaque to
/// the dispatcher beyond this single method.
pub trait SectionRenderer: Send + Sync {
    fn render(&self, props: &Props) -> Result<Node, RenderError>;
}

impl<F> SectionRenderer for F
where
    F: Fn(&Props) -> Result<Node, RenderError> + Send + Sync,
{
    fn render(&self, props: &Props) -> Result<Node, RenderError> {
        self(props)
    }
}

/// A registered section type
#[derive(Clone)]
pub struct RegistryEntry {
    pub section_type: SectionType,
    pub label: Option<String>,
    renderer: Arc<dyn SectionRenderer>,
    default_props: Option<Props>,
    schema: Option<Schema>,
}

impl RegistryEntry {
    pub fn new(section_type: impl Into<SectionType>, renderer: impl SectionRenderer + 'static) -> Self {
        RegistryEntry {
            section_type: section_type.into(),
            label: None,
            renderer: Arc::new(renderer),
            default_props: None,
            schema: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Props template for newly added sections of this type
    pub fn with_default_props(mut self, props: Props) -> Self {
        self.default_props = Some(props);
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn renderer(&self) -> &dyn SectionRenderer {
        self.renderer.as_ref()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Explicit template, else the schema's field defaults, else empty
    pub fn default_props(&self) -> Props {
        match (&self.default_props, &self.schema) {
            (Some(props), _) => props.clone(),
            (None, Some(schema)) => schema.defaults(),
            (None, None) => Props::new(),
        }
    }

    /// Check props against the schema, if one is configured
    pub fn validate_props(&self, props: &Props) -> Result<(), ValidationError> {
        let Some(schema) = &self.schema else {
            return Ok(());
        };
        schema
            .validate(&serde_json::Value::Object(props.clone()))
            .map_err(|violation| ValidationError::InvalidProps {
                section_type: self.section_type.to_string(),
                reason: violation.to_string(),
            })
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("section_type", &self.section_type)
            .field("label", &self.label)
            .field("has_schema", &self.schema.is_some())
            .finish_non_exhaustive()
    }
}

/// Lookup table from section type to registry entry
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl SectionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve a section type; `None` means no renderer is registered
    pub fn resolve(&self, section_type: &str) -> Option<&RegistryEntry> {
        let entry = self.entries.get(section_type);
        if entry.is_none() {
            debug!(section_type, "section type not registered");
        }
        entry
    }

    pub fn contains(&self, section_type: &str) -> bool {
        self.entries.contains_key(section_type)
    }

    /// Registered type names, sorted
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Entries sorted by type name
    pub fn entries(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<&RegistryEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.section_type.cmp(&b.section_type));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries and rejects duplicate registrations
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    pub fn register(mut self, entry: RegistryEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Shorthand for an entry with only a renderer
    pub fn renderer(
        self,
        section_type: impl Into<SectionType>,
        renderer: impl SectionRenderer + 'static,
    ) -> Self {
        self.register(RegistryEntry::new(section_type, renderer))
    }

    /// Build the registry; at most one entry per type
    pub fn build(self) -> Result<SectionRegistry, RegistryError> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for entry in self.entries {
            let key = entry.section_type.to_string();
            if key.is_empty() {
                return Err(RegistryError::EmptyType);
            }
            if entries.contains_key(&key) {
                return Err(RegistryError::DuplicateType { section_type: key });
            }
            entries.insert(key, entry);
        }
        Ok(SectionRegistry { entries })
    }
}
