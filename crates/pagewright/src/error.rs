//! Error types for the pagewright core
//!
//! Errors are organized by domain: page/section invariants, registry
//! configuration and props data.

use thiserror::Error;

/// Main error type for the core library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PagewrightError {
    /// A page or section invariant would be violated
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The section registry was configured inconsistently
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Props data could not be (de)serialized
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Rejections raised before any in-memory state is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate section key: {key}")]
    DuplicateKey { key: String },

    #[error("Section key must not be empty")]
    EmptyKey,

    #[error("Index {index} out of bounds for {len} section(s)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Section not found: {key}")]
    SectionNotFound { key: String },

    #[error("Unknown section type: {section_type}")]
    UnknownSectionType { section_type: String },

    #[error("Invalid props for {section_type}: {reason}")]
    InvalidProps { section_type: String, reason: String },
}

/// Registry configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Section type registered twice: {section_type}")]
    DuplicateType { section_type: String },

    #[error("Section type must not be empty")]
    EmptyType,
}

/// Props serialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("JSON serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("JSON deserialization failed: {reason}")]
    Deserialization { reason: String },

    #[error("Expected a JSON object, got {actual}")]
    NotAnObject { actual: String },
}

/// Shorthand result type for core operations
pub type Result<T> = std::result::Result<T, PagewrightError>;

impl From<serde_json::Error> for PagewrightError {
    fn from(error: serde_json::Error) -> Self {
        let reason = error.to_string();
        if error.is_syntax() || error.is_data() {
            PagewrightError::Data(DataError::Deserialization { reason })
        } else {
            PagewrightError::Data(DataError::Serialization { reason })
        }
    }
}

impl DataError {
    /// Name the JSON kind of a value for diagnostics
    pub fn not_an_object(value: &serde_json::Value) -> Self {
        DataError::NotAnObject {
            actual: json_kind(value).to_string(),
        }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl PagewrightError {
    /// Whether the caller can fix this by changing its input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PagewrightError::Validation(_) | PagewrightError::Data(_)
        )
    }
}
