//! The `npc` host command: list, clear, delete, update.
//!
//! The command runs inside the host's command shell and reports through
//! returned status text, never through errors that would interrupt the
//! session.

use crate::error::{Error, Result};
use crate::serialize::ListScope;
use crate::session::Session;
use crate::sync;
use crate::{MetadataStore, PromptSink};

/// A parsed `npc` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpcCommand {
    /// `list=all` / `list=character` / `list=location` (default `all`).
    List(ListScope),
    /// `list=clear`: drop every store and metadata mirror.
    Clear,
    /// `delete=<id>`.
    Delete { id: String },
    /// `update=<id> property=<name> value=<val>`.
    Update {
        id: String,
        property: String,
        value: String,
    },
}

impl NpcCommand {
    /// Parse the named arguments of an `npc` invocation.
    ///
    /// Accepts the raw argument text with or without a leading `npc` /
    /// `/npc`. Values may be double-quoted to carry spaces.
    pub fn parse(text: &str) -> Result<Self> {
        let mut delete = None;
        let mut update = None;
        let mut property = None;
        let mut value = None;
        let mut list = None;

        for token in split_args(text) {
            if token == "npc" || token == "/npc" {
                continue;
            }
            let Some((key, val)) = token.split_once('=') else {
                return Err(Error::Command(format!("expected name=value, got '{token}'")));
            };
            let val = val.trim_matches('"').to_string();
            match key {
                "list" => list = Some(val),
                "delete" => delete = Some(val),
                "update" => update = Some(val),
                "property" => property = Some(val),
                "value" => value = Some(val),
                _ => return Err(Error::Command(format!("unknown argument '{key}'"))),
            }
        }

        if let Some(id) = delete {
            return Ok(Self::Delete { id });
        }
        if let Some(id) = update {
            let (Some(property), Some(value)) = (property, value) else {
                return Err(Error::Command(
                    "update requires property=<name> and value=<val>".to_string(),
                ));
            };
            return Ok(Self::Update {
                id,
                property,
                value,
            });
        }

        match list.as_deref().unwrap_or("all") {
            "all" => Ok(Self::List(ListScope::All)),
            "clear" => Ok(Self::Clear),
            scope => Ok(Self::List(ListScope::Category(scope.to_string()))),
        }
    }

    /// Execute against a session, resynchronizing the data prompt after any
    /// mutation. Returns the text to hand back to the host shell.
    pub fn execute(
        &self,
        session: &mut Session,
        metadata: &mut dyn MetadataStore,
        sink: &mut dyn PromptSink,
    ) -> Result<String> {
        match self {
            Self::List(scope) => {
                if let ListScope::Category(name) = scope {
                    let known = session
                        .categories()
                        .iter()
                        .any(|category| scope.matches(category.key()));
                    if !known {
                        return Err(Error::UnknownScope(name.clone()));
                    }
                }
                Ok(session.list(scope))
            }
            Self::Clear => {
                sync::clear_all(session, metadata, sink);
                Ok(String::new())
            }
            Self::Delete { id } => {
                let status = session.delete(id);
                sync::sync_data_prompt(session, metadata, sink)?;
                Ok(status)
            }
            Self::Update {
                id,
                property,
                value,
            } => {
                let status = session.set_property(id, property, value);
                sync::sync_data_prompt(session, metadata, sink)?;
                Ok(status)
            }
        }
    }
}

/// Split argument text on whitespace, keeping double-quoted values intact.
fn split_args(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in text.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
