//! Per-chat session owning the category stores and the dirty flag.
//!
//! One session exists per loaded chat. It is created at chat load, reset on
//! chat change, and never shared across chats. All mutation funnels through
//! it so the dirty flag stays consistent.

use crate::MODULE_NAME;
use crate::error::Result;
use crate::record::{ParseOutcome, parse_block};
use crate::rewrite::{self, Replacement};
use crate::serialize::{self, ListScope};
use crate::store::{Category, CategorySpec};

/// Counters from ingesting one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Tag occurrences consumed from the message.
    pub matched: usize,
    /// Records newly inserted.
    pub added: usize,
    /// Records merged onto existing ones.
    pub updated: usize,
    /// Blocks discarded by the parser.
    pub skipped: usize,
}

impl IngestReport {
    #[must_use]
    pub const fn mutated(&self) -> bool {
        self.added + self.updated > 0
    }
}

/// Session state for one chat.
#[derive(Debug, Clone)]
pub struct Session {
    categories: Vec<Category>,
    dirty: bool,
}

impl Session {
    /// Build a session from category specs, compiling all tag matchers.
    pub fn new(specs: &[CategorySpec]) -> Result<Self> {
        let categories = specs
            .iter()
            .map(Category::from_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            categories,
            dirty: false,
        })
    }

    /// Session with the built-in character and location categories.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&crate::store::default_categories())
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut [Category] {
        &mut self.categories
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Process one received message against every category and tag.
    ///
    /// Matched spans are consumed: parsed blocks are upserted and replaced by
    /// their status line, discarded blocks are replaced by nothing. Returns
    /// the rewritten (trimmed) text and counters when anything matched, `None`
    /// when the message carried no tags. The store mutates and the dirty flag
    /// rises only when a record was actually added or updated.
    pub fn ingest_message(&mut self, text: &str) -> Option<(String, IngestReport)> {
        let mut report = IngestReport::default();
        let mut replacements: Vec<Replacement> = Vec::new();

        for category in &mut self.categories {
            // Matchers are read while records mutate, so collect first.
            let blocks: Vec<(std::ops::Range<usize>, String)> = category
                .patterns()
                .iter()
                .flat_map(|pattern| pattern.find_blocks(text))
                .map(|block| (block.span, block.inner.to_string()))
                .collect();

            for (span, inner) in blocks {
                report.matched += 1;
                match parse_block(&inner) {
                    ParseOutcome::Parsed(record) => {
                        let Some((status, name)) = category.upsert(record) else {
                            report.skipped += 1;
                            continue;
                        };
                        match status {
                            crate::store::UpsertStatus::Added => report.added += 1,
                            crate::store::UpsertStatus::Updated => report.updated += 1,
                        }
                        replacements.push(Replacement {
                            span,
                            text: format!("{} {} - {name}", status.as_str(), category.noun()),
                        });
                    }
                    ParseOutcome::Skipped(reason) => {
                        tracing::debug!(category = category.key(), %reason, "discarded block");
                        report.skipped += 1;
                        replacements.push(Replacement {
                            span,
                            text: String::new(),
                        });
                    }
                }
            }
        }

        if report.matched == 0 {
            return None;
        }
        if report.mutated() {
            self.dirty = true;
        }
        Some((rewrite::apply(text, replacements), report))
    }

    /// Remove a record by id, searching categories in order and acting on the
    /// first one that contains it. Always returns a status message.
    pub fn delete(&mut self, id: &str) -> String {
        for category in &mut self.categories {
            if category.delete(id) {
                self.dirty = true;
                return format!("{MODULE_NAME}: Deleted record {id} from {}", category.key());
            }
        }
        format!("{MODULE_NAME}: No record with id {id} in any category")
    }

    /// Set one property on the record with `id`, first matching category wins.
    /// A missing id is reported, never thrown.
    pub fn set_property(&mut self, id: &str, property: &str, value: &str) -> String {
        for category in &mut self.categories {
            if category.set_property(id, property, value) {
                self.dirty = true;
                return format!(
                    "{MODULE_NAME}: Updated record {id} property {property} to {value} in {}",
                    category.key()
                );
            }
        }
        format!("{MODULE_NAME}: No record with id {id} in any category")
    }

    /// Serialize the stores for the given scope.
    #[must_use]
    pub fn list(&self, scope: &ListScope) -> String {
        serialize::render_scope(&self.categories, scope)
    }

    /// Serialize everything.
    #[must_use]
    pub fn render(&self) -> String {
        serialize::render(&self.categories)
    }

    /// Empty every store, keeping categories marked loaded so the next sync
    /// does not rehydrate intentionally cleared data. The store is empty and
    /// clean afterwards; publishing the empty prompt is the sync layer's job.
    pub fn clear_all(&mut self) {
        for category in &mut self.categories {
            category.clear();
        }
        self.dirty = false;
    }

    /// Chat changed: drop all records and loaded state.
    pub fn reset(&mut self) {
        for category in &mut self.categories {
            category.reset();
        }
        self.dirty = false;
    }
}
