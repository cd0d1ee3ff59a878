//! Line commands read from stdin

use crate::state::EditorState;
use anyhow::{bail, Context, Result};
use edit_engine::{KeyChord, KeyPress};
use render_model::RenderItem;
use std::fmt::Write as _;
use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  open | close | toggle        panel visibility
  find <query>                 search (empty query clears)
  next | prev                  move the active match
  replace <text>               replace the active match
  replace-all <text>           replace every match
  key <chord>                  press a key, e.g. `key Mod-f`, `key Escape`
  undo | redo                  document history
  print | status | render      show text, session or decorations
  save [path]                  write the document
  help | quit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Open,
    Close,
    Toggle,
    Find(String),
    Next,
    Previous,
    Replace(String),
    ReplaceAll(String),
    Key(KeyChord),
    Undo,
    Redo,
    Print,
    Status,
    Render,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (line, ""),
        };

        let command = match word {
            "open" => Self::Open,
            "close" => Self::Close,
            "toggle" => Self::Toggle,
            "find" => Self::Find(rest.to_string()),
            "next" => Self::Next,
            "prev" => Self::Previous,
            "replace" => Self::Replace(rest.to_string()),
            "replace-all" => Self::ReplaceAll(rest.to_string()),
            "key" => Self::Key(KeyChord::parse(rest.trim())?),
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "print" => Self::Print,
            "status" => Self::Status,
            "render" => Self::Render,
            "save" => {
                let path = rest.trim();
                Self::Save((!path.is_empty()).then(|| PathBuf::from(path)))
            }
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{}', try 'help'", other),
        };
        Ok(command)
    }
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

fn report(changed: bool) -> String {
    let message = if changed { "ok" } else { "no change" };
    message.to_string()
}

/// Run one command against the editor state
pub fn execute(state: &mut EditorState, command: ReplCommand, json: bool) -> Result<Outcome> {
    let output = match command {
        ReplCommand::Open => report(state.find_replace().open()),
        ReplCommand::Close => report(state.find_replace().close()),
        ReplCommand::Toggle => report(state.find_replace().toggle()),
        ReplCommand::Find(query) => {
            let changed = state.find_replace().find(&query);
            if changed {
                status(state)
            } else {
                report(false)
            }
        }
        ReplCommand::Next => report(state.find_replace().find_next()),
        ReplCommand::Previous => report(state.find_replace().find_previous()),
        ReplCommand::Replace(text) => report(state.find_replace().replace(&text)),
        ReplCommand::ReplaceAll(text) => report(state.find_replace().replace_all(&text)),
        ReplCommand::Key(chord) => {
            let press = KeyPress {
                key: chord.key.clone(),
                ctrl: chord.mod_key,
                meta: false,
                shift: chord.shift,
                alt: chord.alt,
            };
            if state.find_replace().handle_key(&press) {
                "handled".to_string()
            } else {
                "unhandled".to_string()
            }
        }
        ReplCommand::Undo => {
            state.engine.undo()?;
            state.find_replace().refresh();
            "ok".to_string()
        }
        ReplCommand::Redo => {
            state.engine.redo()?;
            state.find_replace().refresh();
            "ok".to_string()
        }
        ReplCommand::Print => state.engine.tree().to_plain_text(),
        ReplCommand::Status => status(state),
        ReplCommand::Render => render(state, json)?,
        ReplCommand::Save(path) => {
            let path = path
                .or_else(|| state.path.clone())
                .context("no path to save to; use `save <path>`")?;
            store::save_document_sync(state.engine.tree(), &path)?;
            tracing::info!(path = %path.display(), "saved document");
            let message = format!("saved {}", path.display());
            state.path = Some(path);
            message
        }
        ReplCommand::Help => HELP.to_string(),
        ReplCommand::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Continue(output))
}

fn status(state: &EditorState) -> String {
    let session = &state.session;
    let active = match session.active_match_index() {
        Some(index) => format!("{}/{}", index + 1, session.match_count()),
        None => format!("0/{}", session.match_count()),
    };
    format!(
        "panel {} | query {:?} | match {}",
        if session.is_panel_open() { "open" } else { "closed" },
        session.query(),
        active
    )
}

fn render(state: &EditorState, json: bool) -> Result<String> {
    let model = state.render();
    if json {
        return Ok(serde_json::to_string_pretty(&model)?);
    }

    let mut out = String::new();
    for item in &model.items {
        match item {
            RenderItem::Highlight(info) => {
                writeln!(out, "highlight [{}, {}) {}", info.from, info.to, info.class_attr())?;
            }
            RenderItem::Selection { from, to, .. } => writeln!(out, "selection [{}, {})", from, to)?,
            RenderItem::Caret { position, .. } => writeln!(out, "caret {}", position)?,
        }
    }
    Ok(out.trim_end().to_string())
}
