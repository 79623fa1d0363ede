//! Pages: ordered collections of sections

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ValidationError;
use crate::section::{Props, Section, SectionKey};

/// Unique identifier for a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        PageId(s)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        PageId(s.to_string())
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted document composed of ordered sections
///
/// Section order is render order. Every section key is unique within the
/// page; the mutation helpers below refuse any change that would break that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,

    pub title: String,

    #[serde(default)]
    pub sections: Vec<Section>,

    /// Revision marker, bumped by the content source on every persist
    #[serde(default)]
    pub revision: u64,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Page {
    /// Create an empty page
    pub fn new(id: impl Into<PageId>, title: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Page {
            id: id.into(),
            title: title.into(),
            sections: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new page builder
    pub fn builder(id: impl Into<PageId>) -> PageBuilder {
        PageBuilder::new(id.into())
    }

    /// Check the key invariants of the section list
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.sections.len());
        for section in &self.sections {
            if section.key.is_empty() {
                return Err(ValidationError::EmptyKey);
            }
            if !seen.insert(section.key.as_str()) {
                return Err(ValidationError::DuplicateKey {
                    key: section.key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section keys in render order
    pub fn keys(&self) -> Vec<&SectionKey> {
        self.sections.iter().map(|s| &s.key).collect()
    }

    pub fn contains_key(&self, key: &SectionKey) -> bool {
        self.position(key).is_some()
    }

    /// Current index of the section with `key`
    pub fn position(&self, key: &SectionKey) -> Option<usize> {
        self.sections.iter().position(|s| &s.key == key)
    }

    pub fn section(&self, key: &SectionKey) -> Option<&Section> {
        self.sections.iter().find(|s| &s.key == key)
    }

    /// Insert a section at `at` (`at == len` appends)
    pub fn insert_section(&mut self, at: usize, section: Section) -> Result<(), ValidationError> {
        if at > self.sections.len() {
            return Err(ValidationError::IndexOutOfBounds {
                index: at,
                len: self.sections.len(),
            });
        }
        if section.key.is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        if self.contains_key(&section.key) {
            return Err(ValidationError::DuplicateKey {
                key: section.key.to_string(),
            });
        }
        self.sections.insert(at, section);
        Ok(())
    }

    /// Remove the section with `key`, returning it
    pub fn remove_section(&mut self, key: &SectionKey) -> Result<Section, ValidationError> {
        let index = self.require_position(key)?;
        Ok(self.sections.remove(index))
    }

    /// Move the section with `key` to `to`, clamped to the last index
    ///
    /// Returns the index the section ended up at.
    pub fn move_section(&mut self, key: &SectionKey, to: usize) -> Result<usize, ValidationError> {
        let from = self.require_position(key)?;
        let target = to.min(self.sections.len() - 1);
        if from != target {
            let section = self.sections.remove(from);
            self.sections.insert(target, section);
        }
        Ok(target)
    }

    /// Replace the props of the section with `key`
    pub fn update_section_props(
        &mut self,
        key: &SectionKey,
        props: Props,
    ) -> Result<(), ValidationError> {
        let index = self.require_position(key)?;
        self.sections[index].props = props;
        Ok(())
    }

    fn require_position(&self, key: &SectionKey) -> Result<usize, ValidationError> {
        self.position(key)
            .ok_or_else(|| ValidationError::SectionNotFound {
                key: key.to_string(),
            })
    }
}

/// Builder for creating pages with a fluent API
#[derive(Debug)]
pub struct PageBuilder {
    id: PageId,
    title: Option<String>,
    sections: Vec<Section>,
    revision: u64,
}

impl PageBuilder {
    pub fn new(id: PageId) -> Self {
        PageBuilder {
            id,
            title: None,
            sections: Vec::new(),
            revision: 0,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a section
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Build the page, checking key invariants
    pub fn build(self) -> Result<Page, ValidationError> {
        let now = OffsetDateTime::now_utc();
        let page = Page {
            id: self.id,
            title: self.title.unwrap_or_default(),
            sections: self.sections,
            revision: self.revision,
            created_at: now,
            updated_at: now,
        };
        page.validate()?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(key: &str) -> Section {
        Section::from_value(key, "hero", json!({})).unwrap()
    }

    fn page(keys: &[&str]) -> Page {
        keys.iter()
            .fold(Page::builder("home").title("Home"), |b, k| b.section(section(k)))
            .build()
            .unwrap()
    }

    fn order(page: &Page) -> Vec<&str> {
        page.sections.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn test_builder_rejects_duplicate_keys() {
        let result = Page::builder("home")
            .section(section("a"))
            .section(section("a"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            ValidationError::DuplicateKey { key: "a".into() }
        );
    }

    #[test]
    fn test_insert_bounds_and_duplicates() {
        let mut page = page(&["a", "b"]);
        assert!(matches!(
            page.insert_section(3, section("c")),
            Err(ValidationError::IndexOutOfBounds { index: 3, len: 2 })
        ));
        assert!(page.insert_section(0, section("b")).is_err());
        page.insert_section(2, section("c")).unwrap();
        assert_eq!(order(&page), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_clamps_to_last_index() {
        let mut page = page(&["a", "b", "c"]);
        let landed = page.move_section(&"a".into(), 99).unwrap();
        assert_eq!(landed, 2);
        assert_eq!(order(&page), vec!["b", "c", "a"]);

        page.move_section(&"a".into(), 0).unwrap();
        assert_eq!(order(&page), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_edits_leave_page_untouched() {
        let mut page = page(&["a", "b"]);
        let before = page.clone();
        assert!(page.remove_section(&"zzz".into()).is_err());
        assert!(page.move_section(&"zzz".into(), 0).is_err());
        assert!(page.update_section_props(&"zzz".into(), Props::new()).is_err());
        assert_eq!(page, before);
    }

    #[test]
    fn test_page_json_shape() {
        let page = page(&["a"]);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["id"], "home");
        assert!(value["createdAt"].is_string());
        assert_eq!(value["sections"][0]["type"], "hero");
    }
}
