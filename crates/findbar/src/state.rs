//! Editor state for one open document

use doc_model::DocumentTree;
use edit_engine::{DeferredQueue, EditingEngine, FindReplace, FindReplaceOptions, SearchSession};
use render_model::{RenderConverter, RenderModel};
use std::path::PathBuf;
use std::time::Instant;
use store::FindReplaceSettings;

/// Everything the find/replace commands borrow, owned in one place
pub struct EditorState {
    /// File path (if loaded from or saved to disk)
    pub path: Option<PathBuf>,
    pub engine: EditingEngine,
    pub session: SearchSession,
    pub effects: DeferredQueue,
    options: FindReplaceOptions,
    converter: RenderConverter,
}

impl EditorState {
    pub fn new(tree: DocumentTree, settings: &FindReplaceSettings) -> Self {
        Self {
            path: None,
            engine: EditingEngine::with_tree(tree),
            session: SearchSession::new(),
            effects: DeferredQueue::with_scroll_delay(settings.scroll_delay()),
            options: settings.options(),
            converter: RenderConverter::new(settings.highlight_classes()),
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Find/replace commands over this document
    pub fn find_replace(&mut self) -> FindReplace<'_, EditingEngine> {
        FindReplace::new(&mut self.session, &mut self.engine, &mut self.effects)
            .with_options(self.options.clone())
    }

    /// Run the effects due by `now`
    pub fn tick(&mut self, now: Instant) -> usize {
        self.find_replace().run_effects(now)
    }

    /// Current decorations
    pub fn render(&self) -> RenderModel {
        self.converter.convert(&self.session, &self.engine.selection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_flow_into_state() {
        let settings = FindReplaceSettings {
            clear_on_close: false,
            highlight_class: "hit".to_string(),
            ..Default::default()
        };
        let mut state = EditorState::new(DocumentTree::from_plain_text("a a"), &settings);

        let mut cmds = state.find_replace();
        cmds.open();
        cmds.find("a");
        cmds.close();
        assert_eq!(state.session.query(), "a");

        state.find_replace().open();
        let model = state.render();
        let classes: Vec<String> = model.highlights().map(|h| h.class_attr()).collect();
        assert_eq!(classes, vec!["hit hit-active", "hit"]);
    }
}
