//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Find and replace over a document, driven from stdin
#[derive(Parser, Debug)]
#[command(name = "findbar", version, about = "Find and replace over a document")]
pub struct CliArgs {
    /// Document to open (`.txt` is imported as plain text)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Directory holding settings.json
    #[arg(long, value_name = "DIR")]
    pub settings_dir: Option<PathBuf>,

    /// Print render items as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// The settings directory, defaulting to the platform data directory
    pub fn settings_dir(&self) -> PathBuf {
        self.settings_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("findbar")
        })
    }
}
