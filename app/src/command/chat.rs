//! Interactive chat host for the extraction pipeline.
//!
//! Simulates the host session loop: each input line is treated as a received
//! AI message, `/npc ...` lines run the management command, and every turn
//! ends with a generation-start sync that rebuilds the injected prompt.

use std::io::{BufRead, Write};

use lorekeep_config::Config;
use lorekeep_core::rules::sync_rules_prompt;
use lorekeep_core::sync::sync_data_prompt;
use lorekeep_core::{MessageRenderer, NpcCommand, RulesSource, Session};
use lorekeep_host::{ChatLog, InMemoryMetadata, InMemoryNotes, PromptBuffer};
use tracing::info;

use super::init_pipeline;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to process (non-interactive mode)
    pub message: Option<String>,
    /// Persona name override for the rules prompt
    pub persona: Option<String>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let persona = input.persona.unwrap_or_else(|| config.persona.name.clone());
        let (session, source) = init_pipeline(&config)?;

        let mut host = Host {
            session,
            source,
            metadata: InMemoryMetadata::new(),
            prompts: PromptBuffer::new(),
            notes: InMemoryNotes::new(),
            chat: ChatLog::new(),
            persona,
        };

        if let Some(message) = input.message {
            host.receive_message(message);
            host.generation_start().await?;
            println!("{}", host.prompts.render_before_prompt());
            return Ok(());
        }

        host.run_interactive().await
    }
}

struct Host {
    session: Session,
    source: Box<dyn RulesSource>,
    metadata: InMemoryMetadata,
    prompts: PromptBuffer,
    notes: InMemoryNotes,
    chat: ChatLog,
    persona: String,
}

impl Host {
    /// Ingest one received AI message, rewriting it in the chat log.
    fn receive_message(&mut self, text: String) {
        let index = self.chat.push(text);
        let Some(current) = self.chat.message(index).map(str::to_string) else {
            return;
        };
        if let Some((rewritten, report)) = self.session.ingest_message(&current) {
            info!(
                matched = report.matched,
                added = report.added,
                updated = report.updated,
                skipped = report.skipped,
                "message ingested"
            );
            self.chat.render(index, &rewritten);
        }
    }

    /// Generation-start hook: republish both prompt fragments.
    async fn generation_start(&mut self) -> anyhow::Result<()> {
        sync_data_prompt(&mut self.session, &mut self.metadata, &mut self.prompts)?;
        sync_rules_prompt(
            &self.persona,
            &mut self.notes,
            self.source.as_ref(),
            &mut self.prompts,
        )
        .await?;
        Ok(())
    }

    /// Run one `/npc` line, reporting failures as status text.
    ///
    /// The session is long-lived; a bad command must never escape the loop
    /// as an error.
    fn run_npc(&mut self, line: &str) -> String {
        let command = match NpcCommand::parse(line.trim_start_matches('/')) {
            Ok(command) => command,
            Err(err) => return err.to_string(),
        };
        match command.execute(&mut self.session, &mut self.metadata, &mut self.prompts) {
            Ok(output) => output,
            Err(err) => err.to_string(),
        }
    }

    /// Chat-change hook: reset stores, then resync.
    async fn chat_changed(&mut self) -> anyhow::Result<()> {
        self.session.reset();
        self.generation_start().await
    }

    async fn run_interactive(&mut self) -> anyhow::Result<()> {
        println!("lorekeep chat host. AI messages are ingested as typed.");
        println!("Commands: /npc ..., /newchat, /prompt, /quit");

        let stdin = std::io::stdin();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();

            match line {
                "" => {}
                "/quit" => break,
                "/prompt" => println!("{}", self.prompts.render_before_prompt()),
                "/newchat" => {
                    self.chat_changed().await?;
                    println!("chat reset");
                }
                command if command.starts_with("/npc") => {
                    let output = self.run_npc(command);
                    if !output.is_empty() {
                        println!("{output}");
                    }
                }
                message => {
                    self.receive_message(message.to_string());
                    self.generation_start().await?;
                }
            }
        }
        Ok(())
    }
}
