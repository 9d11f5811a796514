//! Category-partitioned record stores.
//!
//! Categories are fixed at session start from configuration. Each category
//! owns the tags that route blocks to it, an insertion-ordered id-to-record
//! map, the header emitted while serializing, and the noun used in status
//! lines.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::TagPattern;
use crate::record::Record;

/// Declarative definition of a category, loadable from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Metadata key and stable identity of the category.
    pub key: String,

    /// Header line emitted above each serialized record.
    pub header: String,

    /// Human-readable noun used in status messages.
    pub noun: String,

    /// Tag names in message text that route to this category.
    pub tags: Vec<String>,
}

/// The built-in category set: named characters and locations.
#[must_use]
pub fn default_categories() -> Vec<CategorySpec> {
    vec![
        CategorySpec {
            key: "characters".to_string(),
            header: "# Named Character".to_string(),
            noun: "named character".to_string(),
            tags: vec![
                "namedcharacter".to_string(),
                "clothing".to_string(),
                "opinion".to_string(),
            ],
        },
        CategorySpec {
            key: "locations".to_string(),
            header: "# Location".to_string(),
            noun: "location".to_string(),
            tags: vec!["location".to_string(), "currentlocation".to_string()],
        },
    ]
}

/// Outcome tag of an upsert, used to word the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStatus {
    Added,
    Updated,
}

impl UpsertStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Updated => "Updated",
        }
    }
}

/// One category and its record store.
#[derive(Debug, Clone)]
pub struct Category {
    key: String,
    header: String,
    noun: String,
    patterns: Vec<TagPattern>,
    records: IndexMap<String, Record>,
    /// Whether this store has been hydrated from metadata (or intentionally
    /// cleared). Distinguishes "never loaded" from "cleared on purpose".
    loaded: bool,
}

impl Category {
    /// Build a category from its spec, compiling one matcher per tag.
    pub fn from_spec(spec: &CategorySpec) -> Result<Self> {
        if spec.tags.is_empty() {
            return Err(Error::EmptyTagSet(spec.key.clone()));
        }
        let patterns = spec
            .tags
            .iter()
            .map(|tag| TagPattern::new(tag))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            key: spec.key.clone(),
            header: spec.header.clone(),
            noun: spec.noun.clone(),
            patterns,
            records: IndexMap::new(),
            loaded: false,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn noun(&self) -> &str {
        &self.noun
    }

    #[must_use]
    pub fn patterns(&self) -> &[TagPattern] {
        &self.patterns
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Insert a new record or shallow-merge onto the existing one.
    ///
    /// Returns the status tag and the display name of the resulting record
    /// (falling back to its id when unnamed). Records without an id are the
    /// parser's problem; callers only hand over parsed records.
    pub fn upsert(&mut self, record: Record) -> Option<(UpsertStatus, String)> {
        let id = record.id()?.to_string();
        let status = if let Some(existing) = self.records.get_mut(&id) {
            existing.merge_from(record);
            UpsertStatus::Updated
        } else {
            self.records.insert(id.clone(), record);
            UpsertStatus::Added
        };
        let name = self.records.get(&id).and_then(Record::name).map_or_else(
            || id.clone(),
            std::string::ToString::to_string,
        );
        Some((status, name))
    }

    /// Remove a record by id. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        self.records.shift_remove(id).is_some()
    }

    /// Set one attribute to a string value on an existing record.
    ///
    /// Returns false when the id is unknown to this category.
    pub fn set_property(&mut self, id: &str, property: &str, value: &str) -> bool {
        match self.records.get_mut(id) {
            Some(record) => {
                record.set_string(property, value);
                true
            }
            None => false,
        }
    }

    /// Empty the store. The category stays `loaded`, so a later sync does not
    /// rehydrate what was cleared on purpose.
    pub fn clear(&mut self) {
        self.records.clear();
        self.loaded = true;
    }

    /// Empty the store and forget the loaded state (chat change).
    pub fn reset(&mut self) {
        self.records.clear();
        self.loaded = false;
    }

    /// Populate the store from a persisted record list, skipping entries
    /// without an id. Marks the category loaded either way.
    pub fn load_from(&mut self, records: Vec<Record>) {
        for record in records {
            let Some(id) = record.id().map(str::to_string) else {
                tracing::debug!("skipping persisted {} entry without id", self.key);
                continue;
            };
            self.records.insert(id, record);
        }
        self.loaded = true;
    }

    /// Mark the category loaded without populating it (no persisted data).
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    /// Snapshot of the records for persistence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Record> {
        self.records.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ParseOutcome, parse_block};

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn category() -> Category {
        let spec = &default_categories()[0];
        Category::from_spec(spec).expect("builtin spec should build")
    }

    fn parsed(raw: &str) -> Record {
        match parse_block(raw) {
            ParseOutcome::Parsed(record) => record,
            ParseOutcome::Skipped(reason) => panic!("block should parse, got skip: {reason}"),
        }
    }

    #[test]
    fn test_upsert_adds_then_updates() {
        let mut cat = category();

        let (status, name) = cat
            .upsert(parsed("id: 1\nname: Bob\nmood: happy"))
            .unwrap_or_else(|| panic!("record has an id"));
        assert_eq!(status, UpsertStatus::Added);
        assert_eq!(name, "Bob");

        let (status, name) = cat
            .upsert(parsed("id: 1\nmood: sad"))
            .unwrap_or_else(|| panic!("record has an id"));
        assert_eq!(status, UpsertStatus::Updated);
        assert_eq!(name, "Bob");

        assert_eq!(cat.len(), 1);
        let record = cat.records().next().unwrap_or_else(|| panic!("one record"));
        assert_eq!(record.id(), Some("0001"));
        assert_eq!(record.name(), Some("Bob"));
        assert_eq!(
            record.get("mood"),
            Some(&serde_yaml::Value::String("sad".to_string()))
        );
    }

    #[test]
    fn test_upsert_without_name_reports_id() {
        let mut cat = category();
        let (status, name) = cat
            .upsert(parsed("id: 9\nmood: grim"))
            .unwrap_or_else(|| panic!("record has an id"));
        assert_eq!(status, UpsertStatus::Added);
        assert_eq!(name, "0009");
    }

    #[test]
    fn test_delete_missing_id_leaves_store_unchanged() {
        let mut cat = category();
        cat.upsert(parsed("id: 1\nname: Bob"));
        assert!(!cat.delete("0042"));
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn test_set_property_on_missing_id_fails() {
        let mut cat = category();
        assert!(!cat.set_property("0001", "mood", "sad"));
        cat.upsert(parsed("id: 1\nname: Bob"));
        assert!(cat.set_property("0001", "mood", "sad"));
    }

    #[test]
    fn test_clear_keeps_loaded() {
        let mut cat = category();
        cat.upsert(parsed("id: 1\nname: Bob"));
        cat.clear();
        assert!(cat.is_empty());
        assert!(cat.is_loaded());
    }

    #[test]
    fn test_reset_forgets_loaded() {
        let mut cat = category();
        cat.load_from(vec![parsed("id: 1\nname: Bob")]);
        cat.reset();
        assert!(cat.is_empty());
        assert!(!cat.is_loaded());
    }

    #[test]
    fn test_load_from_skips_entries_without_id() {
        let mut cat = category();
        let mut no_id = Record::new();
        no_id.set_string("name", "ghost");
        cat.load_from(vec![parsed("id: 1\nname: Bob"), no_id]);
        assert_eq!(cat.len(), 1);
        assert!(cat.is_loaded());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cat = category();
        cat.upsert(parsed("id: 2\nname: Second"));
        cat.upsert(parsed("id: 1\nname: First"));
        cat.upsert(parsed("id: 2\nmood: calm"));

        let ids: Vec<&str> = cat.records().filter_map(Record::id).collect();
        assert_eq!(ids, ["0002", "0001"]);
    }
}
