//! Findbar - interactive find and replace
//!
//! Loads a document, then reads commands from stdin one line at a time.
//! Deferred visual effects (selecting the active match, scrolling it into
//! view) are flushed between commands once they come due.

mod cli;
mod commands;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use commands::{execute, Outcome, ReplCommand};
use doc_model::DocumentTree;
use state::EditorState;
use std::time::Instant;
use store::SettingsManager;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    tracing::info!("Starting findbar");

    let settings_dir = args.settings_dir();
    tracing::info!("Settings directory: {:?}", settings_dir);
    let mut settings = SettingsManager::new(settings_dir);
    let find_settings = settings.load().await?.find_replace.clone();

    let mut state = match &args.path {
        Some(path) => {
            let tree = store::open_document(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            EditorState::new(tree, &find_settings).with_path(path.clone())
        }
        None => EditorState::new(DocumentTree::with_empty_paragraph(), &find_settings),
    };

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let output = match ReplCommand::parse(&line).and_then(|cmd| execute(&mut state, cmd, args.json)) {
            Ok(Outcome::Continue(output)) => output,
            Ok(Outcome::Quit) => break,
            Err(e) => format!("error: {:#}", e),
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;

        flush_effects(&mut state, &mut stdout).await?;
        stdout.flush().await?;
    }

    tracing::info!("Exiting findbar");
    Ok(())
}

/// Wait out pending effects and report what they did to the view
async fn flush_effects(state: &mut EditorState, stdout: &mut tokio::io::Stdout) -> Result<()> {
    while let Some(due) = state.effects.next_due() {
        tokio::time::sleep_until(due.into()).await;
        state.tick(Instant::now());

        let selection = state.engine.selection();
        if !selection.is_collapsed() {
            let line = format!("  selected [{}, {})\n", selection.start(), selection.end());
            stdout.write_all(line.as_bytes()).await?;
        }
        if let Some(range) = state.engine.take_reveal_request() {
            let line = format!("  scrolled to [{}, {})\n", range.from, range.to);
            stdout.write_all(line.as_bytes()).await?;
        }
    }
    Ok(())
}
