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

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::command::CommandStrategy;
use crate::command::chat::{ChatInput, ChatStrategy};
use crate::command::init::InitStrategy;
use crate::command::version::VersionStrategy;

mod command;

#[derive(Parser)]
#[command(name = "lorekeep")]
#[command(about = "Entity record tracking for AI chat sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive chat session (or process a single message)
    Chat {
        /// Single AI message to process
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Persona name for the rules prompt
        #[arg(short = 'p', long)]
        persona: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, persona } => {
            ChatStrategy.execute(ChatInput { message, persona }).await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
