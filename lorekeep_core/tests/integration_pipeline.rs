//! Integration tests for the full extraction-merge-serialize pipeline.
//!
//! These tests drive the pipeline the way a host session would: messages
//! arrive, generation starts trigger a sync, commands mutate the stores, and
//! a chat change resets everything.

use std::collections::HashMap;

use lorekeep_core::sync::{self, DATA_PROMPT_KEY};
use lorekeep_core::{
    ListScope, MetadataStore, NpcCommand, PromptPhase, PromptRole, PromptSink, Record, Session,
};

#[derive(Default)]
struct Metadata {
    lists: HashMap<String, Vec<Record>>,
    writes: usize,
}

impl MetadataStore for Metadata {
    fn load(&self, category_key: &str) -> Option<Vec<Record>> {
        self.lists.get(category_key).cloned()
    }

    fn store(&mut self, category_key: &str, records: Vec<Record>) {
        self.writes += 1;
        self.lists.insert(category_key.to_string(), records);
    }
}

#[derive(Default)]
struct Prompts {
    fragments: HashMap<String, String>,
}

impl PromptSink for Prompts {
    fn set_prompt(
        &mut self,
        key: &str,
        text: &str,
        _phase: PromptPhase,
        _priority: u8,
        _role: PromptRole,
    ) {
        self.fragments.insert(key.to_string(), text.to_string());
    }
}

fn session() -> Session {
    Session::with_defaults().expect("builtin categories should build")
}

#[test]
fn test_message_to_published_prompt() {
    let mut session = session();
    let mut metadata = Metadata::default();
    let mut prompts = Prompts::default();

    let (text, report) = session
        .ingest_message(
            "The party arrives. <location>id: 12\nname: Rusty Anchor\nkind: tavern</location>",
        )
        .expect("location tag should match");
    assert_eq!(text, "The party arrives. Added location - Rusty Anchor");
    assert!(report.mutated());

    // Generation starts.
    sync::sync_data_prompt(&mut session, &mut metadata, &mut prompts)
        .expect("sync should succeed");

    let prompt = prompts
        .fragments
        .get(DATA_PROMPT_KEY)
        .expect("data prompt should publish");
    assert!(prompt.contains("# Location"));
    assert!(prompt.contains("id: \"0012\""));
    assert!(prompt.contains("kind: \"tavern\""));

    let persisted = metadata
        .lists
        .get("locations")
        .expect("locations should persist");
    assert_eq!(persisted.len(), 1);
}

#[test]
fn test_session_survives_chat_reload_through_metadata() {
    let mut metadata = Metadata::default();
    let mut prompts = Prompts::default();

    {
        let mut session = session();
        session.ingest_message("<namedcharacter>id: 1\nname: Bob\nmood: happy</namedcharacter>");
        sync::sync_data_prompt(&mut session, &mut metadata, &mut prompts)
            .expect("sync should succeed");
    }

    // A new session for the same chat rehydrates from the mirror.
    let mut session = session();
    sync::sync_data_prompt(&mut session, &mut metadata, &mut prompts)
        .expect("sync should succeed");

    let record = session.categories()[0]
        .records()
        .next()
        .expect("record should rehydrate");
    assert_eq!(record.id(), Some("0001"));
    assert_eq!(record.name(), Some("Bob"));
}

#[test]
fn test_command_cycle_list_update_delete_clear() {
    let mut session = session();
    let mut metadata = Metadata::default();
    let mut prompts = Prompts::default();

    session.ingest_message("<namedcharacter>id: 1\nname: Bob</namedcharacter>");
    session.ingest_message("<location>id: 2\nname: Tavern</location>");

    let listing = NpcCommand::List(ListScope::All)
        .execute(&mut session, &mut metadata, &mut prompts)
        .expect("list should succeed");
    assert!(listing.contains("Bob"));
    assert!(listing.contains("Tavern"));

    let status = NpcCommand::parse("npc update=0001 property=mood value=weary")
        .expect("command should parse")
        .execute(&mut session, &mut metadata, &mut prompts)
        .expect("update should succeed");
    assert!(status.contains("property mood to weary"));

    let status = NpcCommand::Delete {
        id: "0002".to_string(),
    }
    .execute(&mut session, &mut metadata, &mut prompts)
    .expect("delete should succeed");
    assert!(status.contains("from locations"));

    NpcCommand::Clear
        .execute(&mut session, &mut metadata, &mut prompts)
        .expect("clear should succeed");
    assert!(session.categories().iter().all(|cat| cat.is_empty()));
    assert_eq!(
        prompts.fragments.get(DATA_PROMPT_KEY).map(String::as_str),
        Some("")
    );
}

#[test]
fn test_sync_is_idempotent_between_mutations() {
    let mut session = session();
    let mut metadata = Metadata::default();
    let mut prompts = Prompts::default();

    session.ingest_message("<namedcharacter>id: 1\nname: Bob</namedcharacter>");
    sync::sync_data_prompt(&mut session, &mut metadata, &mut prompts)
        .expect("sync should succeed");
    let writes = metadata.writes;

    for _ in 0..3 {
        sync::sync_data_prompt(&mut session, &mut metadata, &mut prompts)
            .expect("sync should succeed");
    }
    assert_eq!(metadata.writes, writes);
}

#[test]
fn test_mixed_tags_in_one_message() {
    let mut session = session();
    let message = "<namedcharacter>id: 1\nname: Bob</namedcharacter> walks into \
                   <location>id: 2\nname: Tavern</location>";
    let (text, report) = session
        .ingest_message(message)
        .expect("both tags should match");

    assert_eq!(report.added, 2);
    assert_eq!(
        text,
        "Added named character - Bob walks into Added location - Tavern"
    );
    assert_eq!(session.categories()[0].len(), 1);
    assert_eq!(session.categories()[1].len(), 1);
}
