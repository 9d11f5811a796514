//! Prompt synchronization: hydrate, publish, persist.
//!
//! Runs on generation start, after a chat change, and after any mutating
//! command. Idempotent: without an intervening mutation a second call
//! performs no further publish and no further metadata write.

use crate::error::Result;
use crate::serialize;
use crate::session::Session;
use crate::{MetadataStore, PromptPhase, PromptRole, PromptSink};

/// Prompt fragment key for the serialized record stores.
pub const DATA_PROMPT_KEY: &str = "lorekeep_data_yaml";
/// Priority of the data fragment; the rules fragment sits below it.
pub const DATA_PROMPT_PRIORITY: u8 = 1;

/// Synchronize the data prompt fragment with the session stores.
///
/// Categories that were never hydrated are loaded from metadata first; the
/// initial hydration marks the session dirty so the fragment is published
/// once even when metadata was empty. When dirty, the stores are rendered,
/// published, and mirrored back to metadata, then the flag clears.
pub fn sync_data_prompt(
    session: &mut Session,
    metadata: &mut dyn MetadataStore,
    sink: &mut dyn PromptSink,
) -> Result<()> {
    hydrate(session, metadata);

    if !session.is_dirty() {
        return Ok(());
    }

    let text = serialize::render(session.categories());
    sink.set_prompt(
        DATA_PROMPT_KEY,
        &text,
        PromptPhase::BeforePrompt,
        DATA_PROMPT_PRIORITY,
        PromptRole::System,
    );

    for category in session.categories() {
        metadata.store(category.key(), category.to_vec());
    }
    session.mark_clean();
    tracing::debug!("published data prompt ({} bytes)", text.len());
    Ok(())
}

/// Empty every store, reset the metadata mirrors, and publish an empty data
/// fragment. The session is clean afterwards and will not rehydrate what was
/// cleared on purpose.
pub fn clear_all(
    session: &mut Session,
    metadata: &mut dyn MetadataStore,
    sink: &mut dyn PromptSink,
) {
    session.clear_all();
    for category in session.categories() {
        metadata.store(category.key(), Vec::new());
    }
    sink.set_prompt(
        DATA_PROMPT_KEY,
        "",
        PromptPhase::BeforePrompt,
        DATA_PROMPT_PRIORITY,
        PromptRole::System,
    );
    tracing::info!("cleared all record stores");
}

fn hydrate(session: &mut Session, metadata: &dyn MetadataStore) {
    let mut hydrated = false;
    for category in session.categories_mut() {
        if category.is_loaded() {
            continue;
        }
        if let Some(records) = metadata.load(category.key()) {
            category.load_from(records);
        } else {
            category.mark_loaded();
        }
        hydrated = true;
    }
    // A fresh session publishes once even when nothing was persisted.
    if hydrated {
        session.mark_dirty();
    }
}
