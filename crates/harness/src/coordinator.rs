use std::{cell::RefCell, fs, path::Path, rc::Rc};

use metaedit_core::{FieldValue, ItemDocument, ItemId};
use metaedit_engine::{Editor, EditorConfig, EngineError};
use tracing::warn;

use crate::{catalog::TestCatalog, error::HarnessError};

/// Plays the editor's top-level controller: fetches and stores items
/// through the catalog, reads and writes import files, and wires the
/// engine calls the way the UI would.
pub struct TestEditor {
    pub catalog: TestCatalog,
    pub editor: Editor,
    dirty_log: Rc<RefCell<Vec<bool>>>,
}

impl TestEditor {
    pub fn new(config: EditorConfig) -> Self {
        let mut editor = Editor::new(config);
        let dirty_log = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&dirty_log);
        editor.on_dirty_changed(move |dirty| log.borrow_mut().push(dirty));
        Self {
            catalog: TestCatalog::new(),
            editor,
            dirty_log,
        }
    }

    /// Add an item to the catalog and open it in the editor.
    pub fn open_new(&mut self, document: ItemDocument) -> Result<ItemId, HarnessError> {
        let item_id = self.catalog.insert(document);
        self.load(item_id)?;
        Ok(item_id)
    }

    pub fn load(&mut self, item_id: ItemId) -> Result<(), HarnessError> {
        let document = self.catalog.fetch(item_id)?;
        self.editor.load(item_id, document);
        Ok(())
    }

    /// Push the live values to the catalog and rebaseline.
    pub fn save(&mut self) -> Result<(), HarnessError> {
        let item_id = self.editor.item_id().ok_or(EngineError::NotTracking)?;
        self.catalog.store(item_id, self.editor.export_document())?;
        self.editor.save_completed()?;
        Ok(())
    }

    pub fn edit(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), HarnessError> {
        self.editor.set_field(name, value.into())?;
        Ok(())
    }

    pub fn import_file(&mut self, path: &Path) -> Result<Vec<String>, HarnessError> {
        let json = fs::read_to_string(path)?;
        let document = ItemDocument::from_json(&json)?;
        Ok(self.editor.begin_import(&document)?)
    }

    pub fn export_file(&self, path: &Path) -> Result<(), HarnessError> {
        fs::write(path, self.editor.export_document().to_json()?)?;
        Ok(())
    }

    /// Accept button. A stale control only gets logged.
    pub fn accept(&mut self, name: &str) -> bool {
        match self.editor.accept_field(name) {
            Ok(()) => true,
            Err(e) => {
                warn!("accept ignored: {e}");
                false
            }
        }
    }

    /// Reject button. A stale control only gets logged.
    pub fn reject(&mut self, name: &str) -> bool {
        match self.editor.reject_field(name) {
            Ok(()) => true,
            Err(e) => {
                warn!("reject ignored: {e}");
                false
            }
        }
    }

    pub fn save_enabled(&self) -> bool {
        self.editor.dirty()
    }

    /// Every value the dirty signal has flipped to, in order.
    pub fn dirty_transitions(&self) -> Vec<bool> {
        self.dirty_log.borrow().clone()
    }
}
