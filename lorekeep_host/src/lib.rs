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

//! Reference implementations of the host collaborators: in-memory chat,
//! metadata, prompt, and note stores, plus file- and HTTP-backed sources for
//! the default-rules document.

pub mod memory;
pub mod rules;

pub use memory::{ChatLog, InMemoryMetadata, InMemoryNotes, PromptBuffer};
pub use rules::{FileRulesSource, HttpRulesSource};
