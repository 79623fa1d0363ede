//! Props schemas for section types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::section::Props;

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Supported field types in a schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Object(Box<Schema>),
    Array(Box<FieldType>),
}

/// A field in a schema with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaField {
    pub key: String,
    pub label: Option<String>,
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl SchemaField {
    pub fn new(key: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        SchemaField {
            key: key.into(),
            label: None,
            field_type,
            required,
            description: None,
            default: None,
        }
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A props value that does not satisfy its schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: &str, message: impl Into<String>) -> Self {
        SchemaViolation {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// A schema describing the props of one section type
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Schema {
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Schema { fields: Vec::new() }
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Add a field to the schema
    pub fn add_field(&mut self, field: SchemaField) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, key: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Props template built from the field defaults
    pub fn defaults(&self) -> Props {
        self.fields
            .iter()
            .filter_map(|f| f.default.clone().map(|d| (f.key.clone(), d)))
            .collect()
    }

    /// Validate that provided data matches this schema
    ///
    /// Unknown keys are allowed so that props written by a newer build
    /// survive a round-trip through an older one.
    pub fn validate(&self, data: &serde_json::Value) -> Result<(), SchemaViolation> {
        self.validate_at(data, "props")
    }

    fn validate_at(&self, data: &serde_json::Value, path: &str) -> Result<(), SchemaViolation> {
        let Some(data_obj) = data.as_object() else {
            return Err(SchemaViolation::new(path, "must be an object"));
        };

        for field in &self.fields {
            let field_path = format!("{}.{}", path, field.key);
            match data_obj.get(&field.key) {
                None | Some(serde_json::Value::Null) if field.required => {
                    return Err(SchemaViolation::new(&field_path, "is required"));
                }
                None | Some(serde_json::Value::Null) => {}
                Some(value) => validate_field_type(&field.field_type, value, &field_path)?,
            }
        }

        Ok(())
    }
}

// Validate that a value matches the expected type
fn validate_field_type(
    field_type: &FieldType,
    value: &serde_json::Value,
    path: &str,
) -> Result<(), SchemaViolation> {
    match field_type {
        FieldType::String if !value.is_string() => {
            Err(SchemaViolation::new(path, "must be a string"))
        }
        FieldType::Number if !value.is_number() => {
            Err(SchemaViolation::new(path, "must be a number"))
        }
        FieldType::Boolean if !value.is_boolean() => {
            Err(SchemaViolation::new(path, "must be a boolean"))
        }
        FieldType::Date => {
            let parsed = value.as_str().map(|s| {
                time::Date::parse(s, DATE_FORMAT).is_ok()
                    || time::OffsetDateTime::parse(
                        s,
                        &time::format_description::well_known::Rfc3339,
                    )
                    .is_ok()
            });
            match parsed {
                Some(true) => Ok(()),
                _ => Err(SchemaViolation::new(path, "must be a date string")),
            }
        }
        FieldType::Object(sub_schema) => sub_schema.validate_at(value, path),
        FieldType::Array(item_type) => {
            let Some(array) = value.as_array() else {
                return Err(SchemaViolation::new(path, "must be an array"));
            };
            for (i, item) in array.iter().enumerate() {
                validate_field_type(item_type, item, &format!("{}[{}]", path, i))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Fluent schema construction, used by the `schema!` macro
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<SchemaField>,
}

impl SchemaBuilder {
    /// Add a required field
    pub fn field(mut self, key: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(SchemaField::new(key, field_type, true));
        self
    }

    /// Add an optional field
    pub fn optional(mut self, key: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(SchemaField::new(key, field_type, false));
        self
    }

    /// Add a fully specified field
    pub fn with(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}
