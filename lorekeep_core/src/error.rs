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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid tag '{tag}': {source}")]
    InvalidTag {
        tag: String,
        #[source]
        source: regex::Error,
    },

    #[error("category '{0}' has no tags")]
    EmptyTagSet(String),

    #[error("unknown list scope: {0}")]
    UnknownScope(String),

    #[error("malformed npc command: {0}")]
    Command(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
