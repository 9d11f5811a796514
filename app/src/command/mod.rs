//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use lorekeep_config::Config;
use lorekeep_core::RulesSource;
use lorekeep_core::Session;
use lorekeep_host::{FileRulesSource, HttpRulesSource};
use tracing::info;

pub mod chat;
pub mod init;
pub mod version;

/// A CLI command implementation.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error when the command cannot complete.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}

/// Build the session and rules source shared by message-processing commands.
pub fn init_pipeline(config: &Config) -> anyhow::Result<(Session, Box<dyn RulesSource>)> {
    let session = Session::new(&config.categories)?;
    info!("Session created with {} categories", config.categories.len());

    let source: Box<dyn RulesSource> = match (
        config.rules.default_rules_path.as_ref(),
        config.rules.default_rules_url.as_ref(),
    ) {
        (Some(path), _) => Box::new(FileRulesSource::new(path.clone())),
        (None, Some(url)) => Box::new(HttpRulesSource::new(url.clone())),
        (None, None) => anyhow::bail!("No default-rules source configured"),
    };

    Ok((session, source))
}
