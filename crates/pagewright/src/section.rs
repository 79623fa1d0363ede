//! Sections: typed, independently configurable units of page content

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, PagewrightError, Result};

/// Untyped props bag as stored at rest
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Stable identity of a section within its page
///
/// Keys are independent of position, so moving a section keeps its key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SectionKey(pub String);

impl SectionKey {
    /// Mint a fresh random key
    pub fn mint() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        SectionKey(format!("sec-{}", &id[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SectionKey {
    fn from(s: String) -> Self {
        SectionKey(s)
    }
}

impl From<&str> for SectionKey {
    fn from(s: &str) -> Self {
        SectionKey(s.to_string())
    }
}

impl AsRef<str> for SectionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Section type tag
///
/// An open namespace: stored data may carry types this build has no
/// renderer for. Comparison is exact and case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SectionType(pub String);

impl SectionType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SectionType {
    fn from(s: String) -> Self {
        SectionType(s)
    }
}

impl From<&str> for SectionType {
    fn from(s: &str) -> Self {
        SectionType(s.to_string())
    }
}

impl AsRef<str> for SectionType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A section of a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub key: SectionKey,

    #[serde(rename = "type")]
    pub section_type: SectionType,

    #[serde(default)]
    pub props: Props,
}

impl Section {
    pub fn new(
        key: impl Into<SectionKey>,
        section_type: impl Into<SectionType>,
        props: Props,
    ) -> Self {
        Self {
            key: key.into(),
            section_type: section_type.into(),
            props,
        }
    }

    /// Create a section with a freshly minted key
    pub fn with_minted_key(section_type: impl Into<SectionType>, props: Props) -> Self {
        Self::new(SectionKey::mint(), section_type, props)
    }

    /// Build a section from a JSON value for its props
    ///
    /// Fails when `props` is anything other than an object; `null` becomes
    /// an empty bag.
    pub fn from_value(
        key: impl Into<SectionKey>,
        section_type: impl Into<SectionType>,
        props: serde_json::Value,
    ) -> Result<Self> {
        Ok(Self::new(key, section_type, props_from_value(props)?))
    }

    /// Props as a JSON value
    pub fn props_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.props.clone())
    }
}

/// Convert a JSON value into a props bag
pub fn props_from_value(value: serde_json::Value) -> Result<Props> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(Props::new()),
        other => Err(PagewrightError::Data(DataError::not_an_object(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minted_keys_are_distinct() {
        let a = SectionKey::mint();
        let b = SectionKey::mint();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("sec-"));
    }

    #[test]
    fn test_section_serializes_type_tag() {
        let section = Section::from_value("s1", "hero", json!({"title": "Welcome"})).unwrap();
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["type"], "hero");
        assert_eq!(value["key"], "s1");
        assert_eq!(value["props"]["title"], "Welcome");
    }

    #[test]
    fn test_missing_props_deserialize_to_empty() {
        let section: Section = serde_json::from_value(json!({"key": "a", "type": "hero"})).unwrap();
        assert!(section.props.is_empty());
    }

    #[test]
    fn test_props_must_be_object() {
        assert!(props_from_value(json!(null)).unwrap().is_empty());
        assert!(props_from_value(json!([1, 2])).is_err());
    }
}
