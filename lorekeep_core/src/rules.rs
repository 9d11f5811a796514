//! Rules prompt: a per-persona note published alongside the data prompt.
//!
//! The note is free text edited by the user. When it is empty or whitespace,
//! the bundled default-rules document is fetched once, stringified as YAML,
//! and cached into the persona's note so later syncs never re-fetch.

use crate::error::Result;
use crate::{PersonaNotes, PromptPhase, PromptRole, PromptSink, RulesSource};

/// Prompt fragment key for the rules document.
pub const RULES_PROMPT_KEY: &str = "lorekeep_rules_yaml";
/// The rules fragment sits below the data fragment.
pub const RULES_PROMPT_PRIORITY: u8 = 0;

/// Publish the rules prompt for the active persona.
///
/// A failed default-rules fetch is recoverable: the fragment stays unset for
/// this cycle and the next generation start retries.
pub async fn sync_rules_prompt(
    persona: &str,
    notes: &mut dyn PersonaNotes,
    source: &dyn RulesSource,
    sink: &mut dyn PromptSink,
) -> Result<()> {
    let mut note = notes.load(persona).unwrap_or_default();

    if note.prompt.trim().is_empty() {
        let rules = match source.fetch_default_rules().await {
            Ok(rules) => rules,
            Err(err) => {
                tracing::warn!(persona, "default rules fetch failed: {err}");
                return Ok(());
            }
        };
        note.prompt = serde_yaml::to_string(&rules)?;
        // The note is storage for the rules text, not an active character note.
        note.use_chara = false;
        notes.store(persona, note.clone());
        tracing::info!(persona, "cached default rules into persona note");
    }

    sink.set_prompt(
        RULES_PROMPT_KEY,
        &note.prompt,
        PromptPhase::BeforePrompt,
        RULES_PROMPT_PRIORITY,
        PromptRole::System,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PersonaNote;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    #[derive(Default)]
    struct FakeNotes {
        notes: HashMap<String, PersonaNote>,
    }

    impl PersonaNotes for FakeNotes {
        fn load(&self, persona: &str) -> Option<PersonaNote> {
            self.notes.get(persona).cloned()
        }

        fn store(&mut self, persona: &str, note: PersonaNote) {
            self.notes.insert(persona.to_string(), note);
        }
    }

    #[derive(Default)]
    struct FakeSink {
        prompts: HashMap<String, (String, u8)>,
    }

    impl PromptSink for FakeSink {
        fn set_prompt(
            &mut self,
            key: &str,
            text: &str,
            _phase: PromptPhase,
            priority: u8,
            _role: PromptRole,
        ) {
            self.prompts.insert(key.to_string(), (text.to_string(), priority));
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        const fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl RulesSource for CountingSource {
        async fn fetch_default_rules(&self) -> anyhow::Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("unreachable resource");
            }
            Ok(serde_json::json!({ "rules": ["stay in character"] }))
        }
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_empty_note_is_filled_from_default_rules() {
        let mut notes = FakeNotes::default();
        let mut sink = FakeSink::default();
        let source = CountingSource::new(false);

        sync_rules_prompt("alice", &mut notes, &source, &mut sink)
            .await
            .expect("sync should succeed");

        let note = notes.notes.get("alice").expect("note should be cached");
        assert!(note.prompt.contains("stay in character"));
        assert!(!note.use_chara);

        let (text, priority) = sink
            .prompts
            .get(RULES_PROMPT_KEY)
            .expect("rules prompt should publish");
        assert_eq!(text, &note.prompt);
        assert_eq!(*priority, RULES_PROMPT_PRIORITY);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_cached_note_is_not_refetched() {
        let mut notes = FakeNotes::default();
        let mut sink = FakeSink::default();
        let source = CountingSource::new(false);

        sync_rules_prompt("alice", &mut notes, &source, &mut sink)
            .await
            .expect("sync should succeed");
        sync_rules_prompt("alice", &mut notes, &source, &mut sink)
            .await
            .expect("sync should succeed");

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_fetch_failure_leaves_prompt_unset() {
        let mut notes = FakeNotes::default();
        let mut sink = FakeSink::default();
        let source = CountingSource::new(true);

        sync_rules_prompt("alice", &mut notes, &source, &mut sink)
            .await
            .expect("fetch failure should be recoverable");

        assert!(sink.prompts.is_empty());
        assert!(notes.notes.is_empty());
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_user_edited_note_is_published_verbatim() {
        let mut notes = FakeNotes::default();
        notes.store(
            "alice",
            PersonaNote {
                prompt: "custom rules".to_string(),
                use_chara: false,
            },
        );
        let mut sink = FakeSink::default();
        let source = CountingSource::new(false);

        sync_rules_prompt("alice", &mut notes, &source, &mut sink)
            .await
            .expect("sync should succeed");

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        let (text, _) = sink
            .prompts
            .get(RULES_PROMPT_KEY)
            .expect("rules prompt should publish");
        assert_eq!(text, "custom rules");
    }
}
