//! Search session state
//!
//! One session per editor instance. It holds the query, the matches found
//! for it, the active match and whether the panel is open. Matches are only
//! valid against the snapshot they were scanned from; the session records
//! that snapshot's version so callers can tell when they went stale.

use crate::{scan, DeferredEffect, DocumentScan, TextEdit, TextRange};
use serde::{Deserialize, Serialize};

/// Direction of match navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// The index step: `+1` or `-1`
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A user action against the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchAction {
    OpenPanel,
    ClosePanel,
    Find { query: String },
    Navigate { direction: Direction },
    Replace { replacement: String },
    ReplaceAll { replacement: String },
}

/// Outcome of a state transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Whether the action was legal and took effect
    pub changed: bool,
    /// Visual effects to schedule once the transition has been applied
    pub effects: Vec<DeferredEffect>,
}

impl Transition {
    fn rejected() -> Self {
        Self::default()
    }

    fn accepted() -> Self {
        Self {
            changed: true,
            effects: Vec::new(),
        }
    }
}

/// Find/replace session state
///
/// Invariants: `active_match_index` is `None` exactly when `matches` is
/// empty, and `matches` is sorted by `from` without overlaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSession {
    query: String,
    matches: Vec<TextRange>,
    active_match_index: Option<usize>,
    is_panel_open: bool,
    /// Version of the snapshot `matches` were computed from
    snapshot_version: Option<u64>,
    /// Bumped on every rescan; deferred effects compare against it
    generation: u64,
}

impl SearchSession {
    /// A closed, empty session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[TextRange] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn active_match_index(&self) -> Option<usize> {
        self.active_match_index
    }

    pub fn active_match(&self) -> Option<TextRange> {
        self.active_match_index.and_then(|i| self.matches.get(i).copied())
    }

    pub fn is_panel_open(&self) -> bool {
        self.is_panel_open
    }

    pub fn snapshot_version(&self) -> Option<u64> {
        self.snapshot_version
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the matches were computed from a different snapshot than
    /// `version`. A session without matches is never stale.
    pub fn is_stale(&self, version: u64) -> bool {
        !self.matches.is_empty() && self.snapshot_version != Some(version)
    }

    /// Apply one of the transitions that need no document mutation.
    ///
    /// `REPLACE` and `REPLACE_ALL` go through the host and are driven by
    /// [`crate::FindReplace`]; here they report no change.
    pub fn apply<D: DocumentScan + ?Sized>(&mut self, action: &SearchAction, doc: &D) -> Transition {
        match action {
            SearchAction::OpenPanel => {
                self.open_panel();
                Transition::accepted()
            }
            SearchAction::ClosePanel => {
                self.close_panel();
                Transition::accepted()
            }
            SearchAction::Find { query } => {
                if self.find(query, doc) {
                    Transition::accepted()
                } else {
                    Transition::rejected()
                }
            }
            SearchAction::Navigate { direction } => match self.navigate(*direction) {
                Some(effect) => Transition {
                    changed: true,
                    effects: vec![effect],
                },
                None => Transition::rejected(),
            },
            SearchAction::Replace { .. } | SearchAction::ReplaceAll { .. } => Transition::rejected(),
        }
    }

    /// `OPEN_PANEL`
    pub fn open_panel(&mut self) {
        self.is_panel_open = true;
    }

    /// `CLOSE_PANEL`. Query and matches are left as they are.
    pub fn close_panel(&mut self) {
        self.is_panel_open = false;
    }

    /// Drop query and matches
    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.active_match_index = None;
        self.snapshot_version = None;
        self.generation += 1;
    }

    /// `FIND`: replace query and matches wholesale with a fresh scan.
    ///
    /// Rejected (returns `false`, state untouched) while the panel is closed.
    pub fn find<D: DocumentScan + ?Sized>(&mut self, query: &str, doc: &D) -> bool {
        if !self.is_panel_open {
            tracing::debug!(query, "find rejected: panel closed");
            return false;
        }

        self.matches = scan(doc, query);
        self.query = query.to_string();
        self.active_match_index = if self.matches.is_empty() { None } else { Some(0) };
        self.snapshot_version = Some(doc.snapshot_version());
        self.generation += 1;

        tracing::debug!(query, matches = self.matches.len(), "find");
        true
    }

    /// Rescan with the current query, keeping the active index where it was
    /// (clamped to the new match count). Returns `false` when the panel is
    /// closed or there is no query to rescan.
    pub fn refresh<D: DocumentScan + ?Sized>(&mut self, doc: &D) -> bool {
        if !self.is_panel_open || self.query.trim().is_empty() {
            return false;
        }

        let previous = self.active_match_index.unwrap_or(0);
        self.matches = scan(doc, &self.query);
        self.active_match_index = match self.matches.len() {
            0 => None,
            len => Some(previous.min(len - 1)),
        };
        self.snapshot_version = Some(doc.snapshot_version());
        self.generation += 1;
        true
    }

    /// `NAVIGATE`: step the active index, wrapping both ways.
    ///
    /// Returns the deferred selection effect for the new active match, or
    /// `None` (state untouched) when the panel is closed or nothing matched.
    pub fn navigate(&mut self, direction: Direction) -> Option<DeferredEffect> {
        if !self.is_panel_open || self.matches.is_empty() {
            return None;
        }

        let len = self.matches.len() as isize;
        let current = self.active_match_index.unwrap_or(0) as isize;
        let next = (current + direction.step()).rem_euclid(len) as usize;
        self.active_match_index = Some(next);

        Some(DeferredEffect::SelectMatch {
            generation: self.generation,
            range: self.matches[next],
        })
    }

    /// The edit `REPLACE` would make: the active match replaced by `replacement`
    pub fn plan_replace(&self, replacement: &str) -> Option<TextEdit> {
        if !self.is_panel_open {
            return None;
        }
        self.active_match()
            .map(|range| TextEdit::new(range, replacement))
    }

    /// The edits `REPLACE_ALL` would make, highest `from` first so that each
    /// edit leaves the ranges still to be processed where they were.
    pub fn plan_replace_all(&self, replacement: &str) -> Option<Vec<TextEdit>> {
        if !self.is_panel_open || self.matches.is_empty() {
            return None;
        }
        let mut edits: Vec<TextEdit> = self
            .matches
            .iter()
            .map(|&range| TextEdit::new(range, replacement))
            .collect();
        edits.sort_by(|a, b| b.range.from.cmp(&a.range.from));
        Some(edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::DocumentTree;

    fn open_session() -> SearchSession {
        let mut session = SearchSession::new();
        session.open_panel();
        session
    }

    #[test]
    fn test_new_session_is_closed_and_empty() {
        let session = SearchSession::new();
        assert!(!session.is_panel_open());
        assert_eq!(session.query(), "");
        assert!(session.matches().is_empty());
        assert_eq!(session.active_match_index(), None);
    }

    #[test]
    fn test_find_requires_open_panel() {
        let tree = DocumentTree::from_plain_text("x marks the spot");
        let mut session = SearchSession::new();
        let before = session.clone();

        assert!(!session.find("x", &tree));
        assert_eq!(session, before);
    }

    #[test]
    fn test_find_sets_first_match_active() {
        let tree = DocumentTree::from_plain_text("cat and cat");
        let mut session = open_session();

        assert!(session.find("cat", &tree));
        assert_eq!(session.match_count(), 2);
        assert_eq!(session.active_match_index(), Some(0));
        assert_eq!(session.active_match(), Some(TextRange::new(1, 4)));
        assert_eq!(session.snapshot_version(), Some(tree.version()));
    }

    #[test]
    fn test_find_without_hits_clears_active() {
        let tree = DocumentTree::from_plain_text("cat and cat");
        let mut session = open_session();
        session.find("cat", &tree);

        assert!(session.find("dog", &tree));
        assert_eq!(session.query(), "dog");
        assert!(session.matches().is_empty());
        assert_eq!(session.active_match_index(), None);
    }

    #[test]
    fn test_navigate_wraps_both_ways() {
        let tree = DocumentTree::from_plain_text("a b a b a");
        let mut session = open_session();
        session.find("a", &tree);
        assert_eq!(session.match_count(), 3);

        session.navigate(Direction::Backward);
        assert_eq!(session.active_match_index(), Some(2));

        session.navigate(Direction::Forward);
        assert_eq!(session.active_match_index(), Some(0));

        session.navigate(Direction::Forward);
        assert_eq!(session.active_match_index(), Some(1));
    }

    #[test]
    fn test_navigate_emits_selection_effect() {
        let tree = DocumentTree::from_plain_text("ab ab");
        let mut session = open_session();
        session.find("ab", &tree);

        let effect = session.navigate(Direction::Forward);
        assert_eq!(
            effect,
            Some(DeferredEffect::SelectMatch {
                generation: session.generation(),
                range: TextRange::new(4, 6),
            })
        );
    }

    #[test]
    fn test_navigate_without_matches_is_noop() {
        let tree = DocumentTree::from_plain_text("nothing here");
        let mut session = open_session();
        session.find("zzz", &tree);
        let before = session.clone();

        assert_eq!(session.navigate(Direction::Forward), None);
        assert_eq!(session, before);
    }

    #[test]
    fn test_close_keeps_state_clear_drops_it() {
        let tree = DocumentTree::from_plain_text("abc");
        let mut session = open_session();
        session.find("b", &tree);

        session.close_panel();
        assert!(!session.is_panel_open());
        assert_eq!(session.query(), "b");

        session.clear();
        assert_eq!(session.query(), "");
        assert_eq!(session.active_match_index(), None);
    }

    #[test]
    fn test_plan_replace_all_is_descending() {
        let tree = DocumentTree::from_plain_text("a a a");
        let mut session = open_session();
        session.find("a", &tree);

        let edits = session.plan_replace_all("bb").unwrap();
        let froms: Vec<usize> = edits.iter().map(|e| e.range.from).collect();
        assert_eq!(froms, vec![5, 3, 1]);
    }

    #[test]
    fn test_refresh_clamps_active_index() {
        let mut tree = DocumentTree::from_plain_text("x x x");
        let mut session = open_session();
        session.find("x", &tree);
        session.navigate(Direction::Backward);
        assert_eq!(session.active_match_index(), Some(2));

        tree.replace_text(3, 6, "").unwrap();
        assert!(session.is_stale(tree.version()));
        assert!(session.refresh(&tree));
        assert_eq!(session.match_count(), 1);
        assert_eq!(session.active_match_index(), Some(0));
        assert!(!session.is_stale(tree.version()));
    }

    #[test]
    fn test_apply_drives_pure_transitions() {
        let tree = DocumentTree::from_plain_text("one one");
        let mut session = SearchSession::new();

        let rejected = session.apply(&SearchAction::Find { query: "one".into() }, &tree);
        assert!(!rejected.changed);

        assert!(session.apply(&SearchAction::OpenPanel, &tree).changed);
        assert!(session.apply(&SearchAction::Find { query: "one".into() }, &tree).changed);

        let nav = session.apply(
            &SearchAction::Navigate {
                direction: Direction::Forward,
            },
            &tree,
        );
        assert!(nav.changed);
        assert_eq!(nav.effects.len(), 1);
        assert_eq!(session.active_match_index(), Some(1));

        let replace = session.apply(&SearchAction::Replace { replacement: "x".into() }, &tree);
        assert_eq!(replace, Transition::default());
    }

    #[test]
    fn test_action_serialization() {
        let action = SearchAction::Navigate {
            direction: Direction::Backward,
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"NAVIGATE","direction":"Backward"}"#);

        let parsed: SearchAction = serde_json::from_str(r#"{"type":"REPLACE_ALL","replacement":"x"}"#).unwrap();
        assert_eq!(
            parsed,
            SearchAction::ReplaceAll {
                replacement: "x".to_string()
            }
        );
    }
}
