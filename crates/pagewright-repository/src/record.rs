//! Loosely typed page records and their normalization into `Page`
//!
//! Content sources hand back whatever shape their backend stores. Field
//! names follow either the canonical form written by [`page_to_record`] or
//! the underscore-prefixed CMS convention (`_id`, `_key`, `_type`, ...).
//! Adaptation is all-or-nothing: a record either becomes a complete `Page`
//! or the call fails with [`TransportError::Malformed`].

use std::collections::HashSet;

use pagewright::{KnownSection, Page, PageId, Props, Section, SectionKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};

use crate::address::ContentAddress;
use crate::error::TransportError;

const TITLE_FIELDS: &[&str] = &["title", "name"];
const SECTION_LIST_FIELDS: &[&str] = &["sections", "content", "blocks"];
const SECTION_KEY_FIELDS: &[&str] = &["key", "_key", "id"];
const SECTION_TYPE_FIELDS: &[&str] = &["type", "_type", "sectionType"];
const SECTION_PROPS_FIELDS: &[&str] = &["props", "data"];
const REVISION_FIELDS: &[&str] = &["revision", "version"];
const CREATED_FIELDS: &[&str] = &["createdAt", "_createdAt"];
const UPDATED_FIELDS: &[&str] = &["updatedAt", "_updatedAt"];

/// A page record as exchanged with a content source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PageRecord(pub Value);

impl PageRecord {
    pub fn new(value: Value) -> Self {
        PageRecord(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Identifier as stored, without normalization
    pub fn id(&self) -> Option<&str> {
        self.0.as_object().and_then(stored_page_id)
    }

    /// Stored revision, zero when absent or unreadable
    pub fn revision(&self) -> u64 {
        self.0
            .as_object()
            .and_then(|obj| read_revision(obj).ok())
            .unwrap_or(0)
    }

    /// Stored creation timestamp field, if any
    pub fn created_at(&self) -> Option<&Value> {
        self.0
            .as_object()
            .and_then(|obj| first_present(obj, CREATED_FIELDS))
    }

    /// Set a top-level field, used by sources to stamp server fields
    pub fn set(&mut self, field: &str, value: Value) {
        if let Value::Object(obj) = &mut self.0 {
            obj.insert(field.to_string(), value);
        }
    }
}

/// Canonical record for a page
pub fn page_to_record(page: &Page) -> Result<PageRecord, TransportError> {
    serde_json::to_value(page)
        .map(PageRecord)
        .map_err(|e| TransportError::malformed(format!("cannot serialize page {}: {}", page.id, e)))
}

/// Normalize a stored record into a `Page`
///
/// When `expected` is given, a record without an identifier takes it, and
/// a record carrying a different identifier is rejected.
pub fn adapt_record(record: &PageRecord, expected: Option<&PageId>) -> Result<Page, TransportError> {
    let obj = record.0.as_object().ok_or_else(|| {
        TransportError::malformed(format!(
            "page record must be an object, got {}",
            kind(&record.0)
        ))
    })?;

    let id = read_page_id(obj, expected)?;
    let title = match first_present(obj, TITLE_FIELDS) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(TransportError::malformed(format!(
                "page {}: title must be a string, got {}",
                id,
                kind(other)
            )));
        }
    };

    let raw_sections = match first_present(obj, SECTION_LIST_FIELDS) {
        None => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return Err(TransportError::malformed(format!(
                "page {}: sections must be an array, got {}",
                id,
                kind(other)
            )));
        }
    };

    let mut sections = Vec::with_capacity(raw_sections.len());
    let mut seen = HashSet::with_capacity(raw_sections.len());
    for (index, raw) in raw_sections.iter().enumerate() {
        let mut section = adapt_section(&id, index, raw)?;
        if section.key.is_empty() || seen.contains(section.key.as_str()) {
            let original = section.key.to_string();
            section.key = unique_key(&id, index, &section, &seen);
            if original.is_empty() {
                debug!(page = %id, index, key = %section.key, "assigned key to section");
            } else {
                warn!(page = %id, index, duplicate = %original, key = %section.key, "re-keyed duplicate section");
            }
        }
        seen.insert(section.key.to_string());

        if let Err(drift) = KnownSection::from_section(&section) {
            warn!(page = %id, key = %section.key, error = %drift, "stored props do not match section type");
        }
        sections.push(section);
    }

    let page = Page {
        id,
        title,
        sections,
        revision: read_revision(obj)?,
        created_at: read_timestamp(obj, CREATED_FIELDS)?,
        updated_at: read_timestamp(obj, UPDATED_FIELDS)?,
    };

    // Keys were made unique above; this guards the invariant itself.
    page.validate()
        .map_err(|e| TransportError::malformed(format!("page {}: {}", page.id, e)))?;
    Ok(page)
}

/// Page identifier field: `id`, then `slug` (or `slug.current`), then `_id`
fn stored_page_id(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("id") {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => match obj.get("slug") {
            Some(Value::String(s)) => Some(s.as_str()),
            Some(Value::Object(slug)) => slug.get("current").and_then(Value::as_str),
            _ => obj.get("_id").and_then(Value::as_str),
        },
    }
}

fn read_page_id(obj: &Map<String, Value>, expected: Option<&PageId>) -> Result<PageId, TransportError> {
    match (stored_page_id(obj), expected) {
        (Some(stored), Some(expected)) if stored != expected.as_str() => {
            Err(TransportError::malformed(format!(
                "record id {} does not match requested page {}",
                stored, expected
            )))
        }
        (Some(stored), _) if !stored.is_empty() => Ok(PageId::from(stored)),
        (_, Some(expected)) => Ok(expected.clone()),
        _ => Err(TransportError::malformed("page record has no identifier")),
    }
}

fn adapt_section(page: &PageId, index: usize, raw: &Value) -> Result<Section, TransportError> {
    let obj = raw.as_object().ok_or_else(|| {
        TransportError::malformed(format!(
            "page {}: section {} must be an object, got {}",
            page,
            index,
            kind(raw)
        ))
    })?;

    let type_field = first_present_field(obj, SECTION_TYPE_FIELDS);
    let section_type = match type_field.map(|(_, value)| value) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return Err(TransportError::malformed(format!(
                "page {}: section {} has no type",
                page, index
            )));
        }
    };

    let key_field = first_present_field(obj, SECTION_KEY_FIELDS);
    let key = match key_field.map(|(_, value)| value) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    let props = match first_present(obj, SECTION_PROPS_FIELDS) {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Null) => Props::new(),
        Some(other) => {
            return Err(TransportError::malformed(format!(
                "page {}: section {} props must be an object, got {}",
                page,
                index,
                kind(other)
            )));
        }
        // CMS records keep fields inline next to the key and type fields.
        // Only the fields actually read as key and type are dropped.
        None => {
            let meta = [key_field, type_field];
            obj.iter()
                .filter(|(field, _)| !meta.iter().flatten().any(|(name, _)| *name == field.as_str()))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        }
    };

    Ok(Section::new(key, section_type, props))
}

/// Deterministic key for a section at `index`, avoiding keys already used
fn unique_key(page: &PageId, index: usize, section: &Section, seen: &HashSet<String>) -> SectionKey {
    let base = format!("{}/{}/{}/{}", page, index, section.section_type, section.key);
    let mut attempt = 0usize;
    loop {
        let seed = if attempt == 0 {
            base.clone()
        } else {
            format!("{}#{}", base, attempt)
        };
        let key = ContentAddress::section_key(&seed);
        if !seen.contains(&key) {
            return SectionKey(key);
        }
        attempt += 1;
    }
}

fn read_revision(obj: &Map<String, Value>) -> Result<u64, TransportError> {
    match first_present(obj, REVISION_FIELDS) {
        None | Some(Value::Null) => {}
        Some(Value::Number(n)) => {
            return n.as_u64().ok_or_else(|| {
                TransportError::malformed(format!("revision must be a non-negative integer, got {}", n))
            });
        }
        Some(Value::String(s)) => {
            return s.parse().map_err(|_| {
                TransportError::malformed(format!("revision must be numeric, got {:?}", s))
            });
        }
        Some(other) => {
            return Err(TransportError::malformed(format!(
                "revision must be a number, got {}",
                kind(other)
            )));
        }
    }

    // CMS revision tokens are opaque unless numeric
    Ok(match obj.get("_rev") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    })
}

fn read_timestamp(obj: &Map<String, Value>, fields: &[&str]) -> Result<OffsetDateTime, TransportError> {
    match first_present(obj, fields) {
        None | Some(Value::Null) => Ok(OffsetDateTime::UNIX_EPOCH),
        Some(Value::String(s)) => OffsetDateTime::parse(s, &Rfc3339).map_err(|e| {
            TransportError::malformed(format!("{} is not an RFC 3339 timestamp: {}", fields[0], e))
        }),
        Some(other) => Err(TransportError::malformed(format!(
            "{} must be a string, got {}",
            fields[0],
            kind(other)
        ))),
    }
}

fn first_present<'a>(obj: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Value> {
    first_present_field(obj, fields).map(|(_, value)| value)
}

fn first_present_field<'a, 'f>(
    obj: &'a Map<String, Value>,
    fields: &[&'f str],
) -> Option<(&'f str, &'a Value)> {
    fields.iter().find_map(|f| obj.get(*f).map(|value| (*f, value)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapt(value: Value) -> Result<Page, TransportError> {
        adapt_record(&PageRecord(value), None)
    }

    #[test]
    fn test_canonical_record() {
        let page = adapt(json!({
            "id": "home",
            "title": "Home",
            "revision": 4,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-02-01T00:00:00Z",
            "sections": [{"key": "s1", "type": "hero", "props": {"title": "Welcome"}}]
        }))
        .unwrap();

        assert_eq!(page.id.as_str(), "home");
        assert_eq!(page.revision, 4);
        assert_eq!(page.sections[0].key.as_str(), "s1");
        assert_eq!(page.sections[0].props["title"], "Welcome");
    }

    #[test]
    fn test_cms_record_with_inline_fields() {
        let page = adapt(json!({
            "_id": "abc",
            "slug": {"current": "admissions"},
            "title": "Admissions",
            "_rev": "xk29sa",
            "content": [
                {"_key": "k1", "_type": "hero", "title": "Apply now"},
                {"_type": "richText", "body": "Deadlines..."}
            ]
        }))
        .unwrap();

        assert_eq!(page.id.as_str(), "admissions");
        assert_eq!(page.revision, 0);
        assert_eq!(page.sections[0].props["title"], "Apply now");
        assert!(!page.sections[0].props.contains_key("_type"));
        assert!(page.sections[1].key.as_str().starts_with("sec-"));
    }

    #[test]
    fn test_inline_fields_keep_unused_key_aliases() {
        let page = adapt(json!({
            "id": "p",
            "sections": [{"_key": "a", "_type": "hero", "id": "anchor", "type": "banner", "title": "x"}]
        }))
        .unwrap();

        let section = &page.sections[0];
        assert_eq!(section.key.as_str(), "a");
        assert_eq!(section.section_type.as_str(), "banner");
        assert_eq!(section.props["id"], "anchor");
        assert_eq!(section.props["title"], "x");
        assert!(!section.props.contains_key("_key"));
        assert!(!section.props.contains_key("type"));
        assert_eq!(section.props["_type"], "hero");
    }

    #[test]
    fn test_record_id_matches_adapted_id() {
        let record = PageRecord(json!({"_id": "abc", "slug": "admissions"}));
        assert_eq!(record.id(), Some("admissions"));
        assert_eq!(adapt_record(&record, None).unwrap().id.as_str(), "admissions");

        let record = PageRecord(json!({"_id": "abc", "slug": {"current": "apply"}}));
        assert_eq!(record.id(), Some("apply"));
        assert_eq!(PageRecord(json!({"_id": "abc"})).id(), Some("abc"));
        assert_eq!(PageRecord(json!({"id": 7, "_id": "abc"})).id(), Some("abc"));
    }

    #[test]
    fn test_missing_props_become_empty_map() {
        let page = adapt(json!({
            "id": "p",
            "sections": [{"key": "a", "type": "hero", "props": null}, {"key": "b", "type": "timeline"}]
        }))
        .unwrap();
        assert!(page.sections.iter().all(|s| s.props.is_empty()));
    }

    #[test]
    fn test_assigned_keys_are_stable_across_loads() {
        let record = json!({"id": "p", "sections": [{"type": "hero"}, {"type": "hero"}]});
        let first = adapt(record.clone()).unwrap();
        let second = adapt(record).unwrap();
        assert_eq!(first.keys(), second.keys());
        assert_ne!(first.sections[0].key, first.sections[1].key);
    }

    #[test]
    fn test_duplicate_keys_are_rekeyed() {
        let page = adapt(json!({
            "id": "p",
            "sections": [{"key": "a", "type": "hero"}, {"key": "a", "type": "courses"}]
        }))
        .unwrap();
        assert_eq!(page.sections[0].key.as_str(), "a");
        assert_ne!(page.sections[1].key.as_str(), "a");
        assert!(page.validate().is_ok());
    }

    #[test]
    fn test_malformed_records_fail_whole() {
        let cases = [
            json!("just a string"),
            json!({"id": "p", "sections": {"not": "a list"}}),
            json!({"id": "p", "sections": [42]}),
            json!({"id": "p", "sections": [{"key": "a"}]}),
            json!({"id": "p", "sections": [{"key": "a", "type": "hero", "props": [1]}]}),
            json!({"id": "p", "title": 7}),
            json!({"id": "p", "revision": "abc"}),
            json!({"id": "p", "updatedAt": "yesterday"}),
            json!({"title": "No id"}),
        ];
        for case in cases {
            let result = adapt(case.clone());
            assert!(
                matches!(result, Err(TransportError::Malformed { .. })),
                "expected malformed for {}",
                case
            );
        }
    }

    #[test]
    fn test_expected_id() {
        let record = PageRecord(json!({"sections": []}));
        let page = adapt_record(&record, Some(&PageId::from("home"))).unwrap();
        assert_eq!(page.id.as_str(), "home");

        let mismatched = PageRecord(json!({"id": "about"}));
        assert!(adapt_record(&mismatched, Some(&PageId::from("home"))).is_err());
    }

    #[test]
    fn test_canonical_round_trip() {
        let page = Page::builder("home")
            .title("Home")
            .section(Section::new("s1", "hero", Props::new()))
            .revision(3)
            .build()
            .unwrap();
        let record = page_to_record(&page).unwrap();
        let back = adapt_record(&record, Some(&page.id)).unwrap();
        assert_eq!(back.sections, page.sections);
        assert_eq!(back.revision, 3);
        assert_eq!(record.revision(), 3);
    }
}
