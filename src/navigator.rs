//! Tag navigator plugin facade
//!
//! Receives the host's document events, feeds the background extraction
//! worker and owns the display model the host's tree view reads.
//!
//! Failure policy: an extraction or parse failure never reaches the model,
//! so the previously displayed tree stays up instead of flickering to
//! empty on a transient failure. Only switching to a document that cannot
//! be tagged (no file name) clears the tree.

use crate::config::NavigatorConfig;
use crate::ctags_manager::{CtagsManager, TagRequest};
use crate::host::EditorView;
use crate::tags::TagModel;

pub struct Navigator {
    manager: CtagsManager,
    model: TagModel,
}

impl Navigator {
    pub fn new(config: &NavigatorConfig) -> Self {
        Self::with_manager(CtagsManager::new(config))
    }

    pub fn with_manager(manager: CtagsManager) -> Self {
        Self {
            manager,
            model: TagModel::default(),
        }
    }

    /// Display projection for the host's tree view.
    pub fn model(&self) -> &TagModel {
        &self.model
    }

    /// Text edited; extraction is scheduled after the debounce window.
    pub fn on_text_changed(&self, editor: &dyn EditorView) {
        if let Some(file_name) = editor.file_name() {
            self.manager.request(TagRequest::TextEdited {
                file_name,
                text: editor.text(),
            });
        }
    }

    /// Document switched; extraction is scheduled immediately.
    pub fn on_document_changed(&mut self, editor: &dyn EditorView) {
        match editor.file_name() {
            Some(file_name) => self.manager.request(TagRequest::DocumentSwitched {
                file_name,
                text: editor.text(),
            }),
            None => self.model.clear(),
        }
    }

    /// Apply any finished extractions. Returns true when the model changed
    /// and the host should refresh its tree view.
    pub fn poll(&mut self) -> bool {
        let mut refreshed = false;
        while let Some(update) = self.manager.poll_update() {
            self.model.set_forest(update.forest);
            refreshed = true;
        }
        refreshed
    }

    pub fn shutdown(&mut self) {
        self.manager.shutdown();
    }
}
