#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Extraction-merge-serialize pipeline for entity records embedded in
//! AI-generated chat messages.
//!
//! Messages may carry tagged YAML blocks (`<namedcharacter>...</namedcharacter>`,
//! `<location>...</location>`). The pipeline extracts those blocks, merges them
//! into per-category record stores, rewrites the consumed spans into status
//! lines, and re-serializes the stores into a system prompt fragment injected
//! before each generation turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod command;
pub mod error;
pub mod extract;
pub mod record;
pub mod rewrite;
pub mod rules;
pub mod serialize;
pub mod session;
pub mod store;
pub mod sync;

pub use command::NpcCommand;
pub use error::{Error, Result};
pub use extract::{TagBlock, TagPattern};
pub use record::{ParseOutcome, Record, SkipReason};
pub use serialize::ListScope;
pub use session::{IngestReport, Session};
pub use store::{Category, CategorySpec, UpsertStatus, default_categories};

/// Module name used to namespace prompt fragment keys and status messages.
pub const MODULE_NAME: &str = "lorekeep";

/// Where a prompt fragment is placed relative to the main generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPhase {
    BeforePrompt,
    InPrompt,
}

/// Role attributed to an injected prompt fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// Free-text note attached to a persona, used as storage for the rules prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaNote {
    pub prompt: String,
    pub use_chara: bool,
}

/// Chat-scoped metadata mirror of the record stores.
///
/// The in-memory store is authoritative during a session; this collaborator
/// only rehydrates a fresh session and absorbs persisted snapshots. Debounced
/// persistence is the implementor's concern.
pub trait MetadataStore {
    /// Load the persisted record list for a category key, if any.
    fn load(&self, category_key: &str) -> Option<Vec<Record>>;

    /// Replace the persisted record list for a category key.
    fn store(&mut self, category_key: &str, records: Vec<Record>);
}

/// Sink for named prompt-injection fragments.
///
/// Setting a fragment under an existing key replaces the previous text.
pub trait PromptSink: Send {
    fn set_prompt(
        &mut self,
        key: &str,
        text: &str,
        phase: PromptPhase,
        priority: u8,
        role: PromptRole,
    );
}

/// Per-persona note storage, keyed by persona name.
pub trait PersonaNotes: Send {
    fn load(&self, persona: &str) -> Option<PersonaNote>;

    fn store(&mut self, persona: &str, note: PersonaNote);
}

/// Source of the bundled default-rules document.
///
/// Fetching is the only suspending operation in the pipeline; it happens at
/// most once per persona.
#[async_trait]
pub trait RulesSource: Send + Sync {
    async fn fetch_default_rules(&self) -> anyhow::Result<serde_json::Value>;
}

/// Host callback asking for a rewritten message to be re-rendered.
pub trait MessageRenderer {
    fn render(&mut self, index: usize, text: &str);
}
