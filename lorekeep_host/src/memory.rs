//! In-memory host stores.
//!
//! Good enough for the CLI host and for tests. A real host would persist the
//! metadata and notes with debounced writes; here "persist" is a map insert
//! plus a debug log line.

use std::collections::HashMap;

use lorekeep_core::{
    MessageRenderer, MetadataStore, PersonaNote, PersonaNotes, PromptPhase, PromptRole,
    PromptSink, Record,
};

/// Chat-scoped metadata mirror held in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetadata {
    lists: HashMap<String, Vec<Record>>,
}

impl InMemoryMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for InMemoryMetadata {
    fn load(&self, category_key: &str) -> Option<Vec<Record>> {
        self.lists.get(category_key).cloned()
    }

    fn store(&mut self, category_key: &str, records: Vec<Record>) {
        tracing::debug!(category_key, count = records.len(), "persisting metadata");
        self.lists.insert(category_key.to_string(), records);
    }
}

/// One published prompt fragment.
#[derive(Debug, Clone)]
pub struct PromptFragment {
    pub text: String,
    pub phase: PromptPhase,
    pub priority: u8,
    pub role: PromptRole,
}

/// Prompt-injection sink with replace-by-key semantics.
#[derive(Debug, Default)]
pub struct PromptBuffer {
    fragments: HashMap<String, PromptFragment>,
}

impl PromptBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fragment(&self, key: &str) -> Option<&PromptFragment> {
        self.fragments.get(key)
    }

    /// Concatenate the before-prompt fragments in ascending priority order,
    /// the order they would be injected into the generation context.
    #[must_use]
    pub fn render_before_prompt(&self) -> String {
        let mut fragments: Vec<&PromptFragment> = self
            .fragments
            .values()
            .filter(|f| f.phase == PromptPhase::BeforePrompt && !f.text.is_empty())
            .collect();
        fragments.sort_by_key(|f| f.priority);
        fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl PromptSink for PromptBuffer {
    fn set_prompt(
        &mut self,
        key: &str,
        text: &str,
        phase: PromptPhase,
        priority: u8,
        role: PromptRole,
    ) {
        self.fragments.insert(
            key.to_string(),
            PromptFragment {
                text: text.to_string(),
                phase,
                priority,
                role,
            },
        );
    }
}

/// Persona note storage held in memory.
#[derive(Debug, Default)]
pub struct InMemoryNotes {
    notes: HashMap<String, PersonaNote>,
}

impl InMemoryNotes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersonaNotes for InMemoryNotes {
    fn load(&self, persona: &str) -> Option<PersonaNote> {
        self.notes.get(persona).cloned()
    }

    fn store(&mut self, persona: &str, note: PersonaNote) {
        tracing::debug!(persona, "persisting persona note");
        self.notes.insert(persona.to_string(), note);
    }
}

/// Indexable chat message store that re-renders to stdout.
#[derive(Debug, Default)]
pub struct ChatLog {
    messages: Vec<String>,
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, returning its index.
    pub fn push(&mut self, text: String) -> usize {
        self.messages.push(text);
        self.messages.len() - 1
    }

    #[must_use]
    pub fn message(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(String::as_str)
    }

    pub fn set_message(&mut self, index: usize, text: String) {
        if let Some(slot) = self.messages.get_mut(index) {
            *slot = text;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageRenderer for ChatLog {
    fn render(&mut self, index: usize, text: &str) {
        self.set_message(index, text.to_string());
        println!("[{index}] {text}");
    }
}
