//! Find/replace commands
//!
//! The operations a UI or keymap calls. Each one borrows the session, the
//! host and the effect queue for the duration of the call and reports
//! whether it took effect.

use crate::{
    DeferredQueue, Direction, DocumentMutation, DocumentScan, EditError, Result, SearchAction,
    SearchHost, SearchSession,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// A key binding such as `Mod-f` or `Shift-Alt-Enter`.
///
/// `Mod` is Ctrl or Cmd, whichever the platform uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    pub mod_key: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    /// Parse a `-` separated chord; the last segment is the key
    pub fn parse(chord: &str) -> Result<Self> {
        // A trailing "-" after a separator (or on its own) is the minus key
        let (modifiers, key) = if chord == "-" {
            (None, "-")
        } else if let Some(prefix) = chord.strip_suffix("--") {
            ((!prefix.is_empty()).then_some(prefix), "-")
        } else {
            match chord.rsplit_once('-') {
                Some((prefix, key)) => (Some(prefix), key),
                None => (None, chord),
            }
        };
        if key.is_empty() {
            return Err(EditError::InvalidCommand(format!(
                "Key chord '{}' has no key",
                chord
            )));
        }

        let mut parsed = Self {
            key: key.to_string(),
            mod_key: false,
            shift: false,
            alt: false,
        };
        for modifier in modifiers.into_iter().flat_map(|m| m.split('-')) {
            match modifier {
                "Mod" | "Ctrl" | "Cmd" | "Meta" => parsed.mod_key = true,
                "Shift" => parsed.shift = true,
                "Alt" => parsed.alt = true,
                other => {
                    return Err(EditError::InvalidCommand(format!(
                        "Unknown modifier '{}' in key chord '{}'",
                        other, chord
                    )))
                }
            }
        }
        Ok(parsed)
    }

    /// Whether `press` triggers this chord
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.key.eq_ignore_ascii_case(&press.key)
            && self.mod_key == (press.ctrl || press.meta)
            && self.shift == press.shift
            && self.alt == press.alt
    }
}

impl Default for KeyChord {
    fn default() -> Self {
        Self {
            key: "f".to_string(),
            mod_key: true,
            shift: false,
            alt: false,
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mod_key {
            write!(f, "Mod-")?;
        }
        if self.shift {
            write!(f, "Shift-")?;
        }
        if self.alt {
            write!(f, "Alt-")?;
        }
        write!(f, "{}", self.key)
    }
}

/// A key event as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyPress {
    /// A press with no modifiers held
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

/// Behaviour switches for [`FindReplace`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindReplaceOptions {
    /// Drop query and matches when the panel closes
    pub clear_on_close: bool,
    /// Opens the panel
    pub open_shortcut: KeyChord,
}

impl Default for FindReplaceOptions {
    fn default() -> Self {
        Self {
            clear_on_close: true,
            open_shortcut: KeyChord::default(),
        }
    }
}

/// Find/replace operations over one session and its host
pub struct FindReplace<'a, H: SearchHost + ?Sized> {
    session: &'a mut SearchSession,
    host: &'a mut H,
    effects: &'a mut DeferredQueue,
    options: FindReplaceOptions,
}

impl<'a, H: SearchHost + ?Sized> FindReplace<'a, H> {
    pub fn new(session: &'a mut SearchSession, host: &'a mut H, effects: &'a mut DeferredQueue) -> Self {
        Self {
            session,
            host,
            effects,
            options: FindReplaceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FindReplaceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session(&self) -> &SearchSession {
        self.session
    }

    /// Route a [`SearchAction`] to the matching operation
    pub fn dispatch(&mut self, action: SearchAction) -> bool {
        match action {
            SearchAction::OpenPanel => self.open(),
            SearchAction::ClosePanel => self.close(),
            SearchAction::Find { query } => self.find(&query),
            SearchAction::Navigate { direction } => self.navigate(direction),
            SearchAction::Replace { replacement } => self.replace(&replacement),
            SearchAction::ReplaceAll { replacement } => self.replace_all(&replacement),
        }
    }

    /// Open the panel. A query kept from a previous close is searched again
    /// against the current document.
    pub fn open(&mut self) -> bool {
        if self.session.is_panel_open() {
            return false;
        }
        self.session.open_panel();

        if !self.session.query().is_empty() {
            let query = self.session.query().to_string();
            self.session.find(&query, &*self.host);
        }
        true
    }

    /// Close the panel, clearing the search when `clear_on_close` is set
    pub fn close(&mut self) -> bool {
        if !self.session.is_panel_open() {
            return false;
        }
        self.session.close_panel();
        if self.options.clear_on_close {
            self.session.clear();
        }
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.session.is_panel_open() {
            self.close()
        } else {
            self.open()
        }
    }

    pub fn find(&mut self, query: &str) -> bool {
        self.session.find(query, &*self.host)
    }

    pub fn find_next(&mut self) -> bool {
        self.navigate(Direction::Forward)
    }

    pub fn find_previous(&mut self) -> bool {
        self.navigate(Direction::Backward)
    }

    fn navigate(&mut self, direction: Direction) -> bool {
        match self.session.navigate(direction) {
            Some(effect) => {
                self.effects.schedule_tick(Instant::now(), effect);
                true
            }
            None => false,
        }
    }

    /// Replace the active match, leave the cursor after the new text and
    /// search again for the same query
    pub fn replace(&mut self, text: &str) -> bool {
        if !self.session.is_panel_open() {
            return false;
        }
        self.refresh_if_stale();

        let Some(edit) = self.session.plan_replace(text) else {
            return false;
        };

        if let Err(e) = self.host.apply_edit(edit.range, &edit.text) {
            tracing::warn!(range = ?edit.range, "replace failed: {}", e);
            return false;
        }
        if let Err(e) = self.host.move_cursor_to(edit.end_after_insert()) {
            tracing::warn!("failed to move cursor after replace: {}", e);
        }

        let query = self.session.query().to_string();
        self.session.find(&query, &*self.host);
        true
    }

    /// Replace every match as a single edit, then clear the search
    pub fn replace_all(&mut self, text: &str) -> bool {
        if !self.session.is_panel_open() {
            return false;
        }
        self.refresh_if_stale();

        let Some(edits) = self.session.plan_replace_all(text) else {
            return false;
        };

        if let Err(e) = self.host.apply_edits(&edits) {
            tracing::warn!(count = edits.len(), "replace all failed: {}", e);
            return false;
        }
        tracing::debug!(count = edits.len(), "replaced all matches");

        self.session.find("", &*self.host);
        true
    }

    /// Rescan the current query against the current document
    pub fn refresh(&mut self) -> bool {
        self.session.refresh(&*self.host)
    }

    fn refresh_if_stale(&mut self) {
        let version = self.host.snapshot_version();
        if self.session.is_stale(version) {
            tracing::debug!(version, "matches stale, rescanning");
            self.session.refresh(&*self.host);
        }
    }

    /// Keymap entry point. Returns `true` when the key was handled.
    pub fn handle_key(&mut self, press: &KeyPress) -> bool {
        if self.options.open_shortcut.matches(press) {
            self.open();
            return true;
        }
        if press.key == "Escape" && self.session.is_panel_open() {
            return self.close();
        }
        false
    }

    /// Run the visual effects that are due
    pub fn run_effects(&mut self, now: Instant) -> usize {
        self.effects.run_due(now, &*self.session, &mut *self.host)
    }
}
