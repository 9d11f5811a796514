use lorekeep_config::Config;

/// Strategy for initializing the configuration.
///
/// Creates the default configuration and default-rules files under
/// `~/lorekeep/`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, (): Self::Input) -> anyhow::Result<()> {
        Config::create_config()
    }
}
