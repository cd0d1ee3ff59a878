//! Integration tests for find/replace
//! Drives the full command surface against a real editing engine
//!
//! Documents are built from plain text, one paragraph per line, so the
//! first character of the first line sits at position 1.

use doc_model::{DocumentTree, Hyperlink, Paragraph, Run, RunStyle, Selection};
use edit_engine::{
    scan, DeferredQueue, DocumentScan, EditingEngine, FindReplace, KeyPress, SearchSession,
    TextRange,
};
use std::time::{Duration, Instant};

/// Test harness owning everything a find/replace call borrows
struct FindHarness {
    session: SearchSession,
    engine: EditingEngine,
    effects: DeferredQueue,
}

impl FindHarness {
    fn new(text: &str) -> Self {
        Self::with_tree(DocumentTree::from_plain_text(text))
    }

    fn with_tree(tree: DocumentTree) -> Self {
        Self {
            session: SearchSession::new(),
            engine: EditingEngine::with_tree(tree),
            effects: DeferredQueue::new(),
        }
    }

    fn cmds(&mut self) -> FindReplace<'_, EditingEngine> {
        FindReplace::new(&mut self.session, &mut self.engine, &mut self.effects)
    }

    /// Open the panel and search
    fn search(&mut self, query: &str) -> bool {
        let mut cmds = self.cmds();
        cmds.open();
        cmds.find(query)
    }

    fn text(&self) -> String {
        self.engine.tree().to_plain_text()
    }

    /// Match ranges relative to the first character of the document
    fn offsets(&self) -> Vec<(usize, usize)> {
        self.session
            .matches()
            .iter()
            .map(|m| (m.from - 1, m.to - 1))
            .collect()
    }
}

// =========================================================================
// Scanner
// =========================================================================

#[test]
fn test_non_overlapping_matches() {
    let mut h = FindHarness::new("aaaa");
    h.search("aa");
    assert_eq!(h.offsets(), vec![(0, 2), (2, 4)]);

    let mut h = FindHarness::new("aaa");
    h.search("aa");
    assert_eq!(h.offsets(), vec![(0, 2)]);
}

#[test]
fn test_case_insensitive_and_original_casing_kept() {
    let mut h = FindHarness::new("Hello hello");
    h.search("hello");
    assert_eq!(h.offsets(), vec![(0, 5), (6, 11)]);

    assert!(h.cmds().replace("X"));
    assert_eq!(h.text(), "X hello");
}

#[test]
fn test_empty_query_yields_no_matches() {
    let tree = DocumentTree::from_plain_text("some text\nwith   spaces");
    assert!(scan(&tree, "").is_empty());
    assert!(scan(&tree, "   ").is_empty());

    let mut h = FindHarness::with_tree(tree);
    assert!(h.search("   "));
    assert!(h.session.matches().is_empty());
    assert_eq!(h.session.active_match_index(), None);
}

#[test]
fn test_matches_stay_within_runs() {
    let mut tree = DocumentTree::new();
    let para = tree.insert_paragraph(Paragraph::new(), tree.root_id(), None).unwrap();
    tree.insert_run(Run::new("sea"), para, None).unwrap();
    tree.insert_run(Run::with_style("shell", RunStyle::italic()), para, None).unwrap();
    let link = tree.insert_hyperlink(Hyperlink::new("https://example.com"), para, None).unwrap();
    tree.insert_run_into_hyperlink(Run::new("seashell"), link, None).unwrap();

    let mut h = FindHarness::with_tree(tree);
    h.search("seashell");
    // p(0) "sea"[1,4) "shell"[4,9) link(9) "seashell"[10,18)
    assert_eq!(h.session.matches(), &[TextRange::new(10, 18)]);
}

// =========================================================================
// Session
// =========================================================================

#[test]
fn test_navigation_wraps() {
    let mut h = FindHarness::new("a-a-a");
    h.search("a");
    assert_eq!(h.session.match_count(), 3);
    assert_eq!(h.session.active_match_index(), Some(0));

    assert!(h.cmds().find_previous());
    assert_eq!(h.session.active_match_index(), Some(2));

    assert!(h.cmds().find_next());
    assert_eq!(h.session.active_match_index(), Some(0));
}

#[test]
fn test_navigation_without_matches() {
    let mut h = FindHarness::new("abc");
    h.search("zzz");
    assert!(!h.cmds().find_next());
    assert!(!h.cmds().find_previous());
    assert!(h.effects.is_empty());
}

#[test]
fn test_replace_invalidates_and_rebuilds() {
    let mut h = FindHarness::new("cat and cat");
    h.search("cat");
    assert_eq!(h.offsets(), vec![(0, 3), (8, 11)]);

    assert!(h.cmds().replace("dog"));
    assert_eq!(h.text(), "dog and cat");
    assert_eq!(h.offsets(), vec![(8, 11)]);
    assert_eq!(h.session.snapshot_version(), Some(h.engine.snapshot_version()));

    // A longer replacement shifts the remaining match
    let mut h = FindHarness::new("cat and cat");
    h.search("cat");
    h.cmds().replace("horse");
    assert_eq!(h.offsets(), vec![(10, 13)]);
}

#[test]
fn test_replace_all_is_order_safe() {
    let mut h = FindHarness::new("a a a");
    h.search("a");
    assert!(h.cmds().replace_all("bb"));
    assert_eq!(h.text(), "bb bb bb");
    assert_eq!(h.session.query(), "");
    assert!(h.session.matches().is_empty());
}

#[test]
fn test_replace_all_across_paragraphs_is_one_undo_step() {
    let mut h = FindHarness::new("one two\ntwo three\nfour");
    h.search("two");
    assert_eq!(h.session.match_count(), 2);

    assert!(h.cmds().replace_all("2"));
    assert_eq!(h.text(), "one 2\n2 three\nfour");

    h.engine.undo().unwrap();
    assert_eq!(h.text(), "one two\ntwo three\nfour");
    assert!(!h.engine.can_undo());
}

#[test]
fn test_replace_all_deleting_whole_runs_can_be_undone() {
    let mut h = FindHarness::new("cat");
    h.search("cat");
    assert!(h.cmds().replace_all(""));
    assert_eq!(h.text(), "");

    h.engine.undo().unwrap();
    assert_eq!(h.text(), "cat");
    assert!(!h.engine.can_undo());
    assert!(h.engine.can_redo());

    h.engine.redo().unwrap();
    assert_eq!(h.text(), "");
}

#[test]
fn test_undo_keeps_styled_runs_apart() {
    let mut tree = DocumentTree::new();
    let para = tree.insert_paragraph(Paragraph::new(), tree.root_id(), None).unwrap();
    tree.insert_run(Run::new("a "), para, None).unwrap();
    tree.insert_run(Run::with_style("cat", RunStyle::bold()), para, None).unwrap();
    let mut h = FindHarness::with_tree(tree);

    h.search("cat");
    assert!(h.cmds().replace(""));
    assert_eq!(h.text(), "a ");

    h.engine.undo().unwrap();
    let tree = h.engine.tree();
    let runs: Vec<(String, bool)> = tree
        .text_segments()
        .iter()
        .filter_map(|seg| tree.get_run(seg.run_id))
        .map(|run| (run.text.clone(), run.style.bold))
        .collect();
    assert_eq!(runs, vec![("a ".to_string(), false), ("cat".to_string(), true)]);
}

#[test]
fn test_replace_with_no_active_match() {
    let mut h = FindHarness::new("abc");
    h.search("q");
    assert!(!h.cmds().replace("x"));
    assert!(!h.cmds().replace_all("x"));
    assert_eq!(h.text(), "abc");
}

#[test]
fn test_panel_closed_guard() {
    let mut h = FindHarness::new("x marks x");
    let before = h.session.clone();

    let mut cmds = h.cmds();
    assert!(!cmds.find("x"));
    assert!(!cmds.find_next());
    assert!(!cmds.replace("y"));
    assert!(!cmds.replace_all("y"));

    assert_eq!(h.session, before);
    assert_eq!(h.text(), "x marks x");
}

#[test]
fn test_close_clears_state() {
    let mut h = FindHarness::new("abc abc");
    h.search("abc");
    assert!(h.cmds().close());
    assert!(!h.session.is_panel_open());
    assert_eq!(h.session.query(), "");
    assert!(h.session.matches().is_empty());
}

// =========================================================================
// Deferred effects
// =========================================================================

#[test]
fn test_navigate_selects_then_scrolls() {
    let mut h = FindHarness::new("one two one");
    h.search("one");
    h.cmds().find_next();

    // Nothing happens inside the transition itself
    assert_eq!(h.engine.selection(), Selection::default());

    let now = Instant::now();
    assert_eq!(h.cmds().run_effects(now), 1);
    assert_eq!(h.engine.selection(), Selection::new(9, 12));
    assert_eq!(h.engine.take_reveal_request(), None);

    assert_eq!(h.cmds().run_effects(now + Duration::from_millis(100)), 1);
    assert_eq!(h.engine.take_reveal_request(), Some(TextRange::new(9, 12)));
}

#[test]
fn test_stale_effects_are_absorbed() {
    let mut h = FindHarness::new("ab ab ab");
    h.search("ab");
    h.cmds().find_next();
    // New search before the deferred selection fires
    h.cmds().find("b");

    let now = Instant::now();
    assert_eq!(h.cmds().run_effects(now), 0);
    assert_eq!(h.engine.selection(), Selection::default());

    // Panel closed before the scroll fires
    h.cmds().find_next();
    assert_eq!(h.cmds().run_effects(Instant::now()), 1);
    h.cmds().close();
    assert_eq!(h.cmds().run_effects(now + Duration::from_secs(1)), 0);
    assert_eq!(h.engine.take_reveal_request(), None);
}

#[test]
fn test_keyboard_shortcuts() {
    let mut h = FindHarness::new("abc");
    assert!(h.cmds().handle_key(&KeyPress::plain("f").with_ctrl()));
    assert!(h.session.is_panel_open());
    assert!(h.cmds().handle_key(&KeyPress::plain("Escape")));
    assert!(!h.session.is_panel_open());
}
