//! Editor state to render model conversion

use crate::{search_highlights, HighlightClasses, RenderModel, SelectionRenderer};
use doc_model::Selection;
use edit_engine::SearchSession;

/// Builds the decorations the frontend draws over the document text
pub struct RenderConverter {
    classes: HighlightClasses,
    selection: SelectionRenderer,
}

impl RenderConverter {
    pub fn new(classes: HighlightClasses) -> Self {
        Self {
            classes,
            selection: SelectionRenderer::default(),
        }
    }

    pub fn classes(&self) -> &HighlightClasses {
        &self.classes
    }

    /// Match highlights first, selection or caret on top
    pub fn convert(&self, session: &SearchSession, selection: &Selection) -> RenderModel {
        let mut model = RenderModel::new();
        for highlight in search_highlights(session, &self.classes) {
            model.add(highlight.to_render_item());
        }
        model.add(self.selection.render(selection));
        model
    }
}

impl Default for RenderConverter {
    fn default() -> Self {
        Self::new(HighlightClasses::default())
    }
}
