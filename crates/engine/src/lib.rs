pub mod config;
pub mod error;
pub mod item_state;
pub mod reconciler;
pub mod snapshot;
pub mod tracker;

pub use config::{EditorConfig, LabelSetEquality};
pub use error::EngineError;
pub use item_state::{EditableItemState, ItemState};
pub use reconciler::{ImportReconciler, ReviewState};
pub use snapshot::{Snapshot, SnapshotStore};
pub use tracker::{DirtyTracker, PauseGuard, ReviewGate};

use std::{
    collections::BTreeMap,
    panic::{self, AssertUnwindSafe},
};

use metaedit_core::{FieldValue, ItemDocument, ItemId};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    Idle,
    Active,
    ImportPending,
}

impl TrackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::ImportPending => "import_pending",
        }
    }
}

/// Change tracking and staged import for one editor pane.
///
/// Owns the edit buffer, so every call into the tracker and reconciler is
/// serialized through `&mut self`. The engine does no locking of its own;
/// a caller doing I/O on other threads must funnel results back to the
/// thread that owns the editor.
pub struct Editor<S: EditableItemState = ItemState> {
    config: EditorConfig,
    item_id: Option<ItemId>,
    state: S,
    tracker: DirtyTracker,
    reconciler: ImportReconciler,
}

impl Editor<ItemState> {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(config, ItemState::new())
    }
}

impl Default for Editor<ItemState> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<S: EditableItemState> Editor<S> {
    pub fn with_state(config: EditorConfig, state: S) -> Self {
        let tracker = DirtyTracker::new(SnapshotStore::new(&config));
        Self {
            config,
            item_id: None,
            state,
            tracker,
            reconciler: ImportReconciler::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn item_id(&self) -> Option<ItemId> {
        self.item_id
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    pub fn reconciler(&self) -> &ImportReconciler {
        &self.reconciler
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.state.field(name)
    }

    pub fn dirty(&self) -> bool {
        self.tracker.dirty()
    }

    pub fn mode(&self) -> TrackingMode {
        if !self.tracker.is_tracking() {
            TrackingMode::Idle
        } else if self.reconciler.has_pending_review() {
            TrackingMode::ImportPending
        } else {
            TrackingMode::Active
        }
    }

    /// Callback fired whenever the dirty signal flips, e.g. to toggle Save.
    pub fn on_dirty_changed(&mut self, listener: impl FnMut(bool) + 'static) {
        self.tracker.set_listener(Box::new(listener));
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load an item: discard any previous tracking, populate the state,
    /// then capture the baseline from the populated values.
    pub fn load(&mut self, item_id: ItemId, document: ItemDocument) {
        self.tracker.stop_tracking();
        self.reconciler.clear();
        self.state.reset(document.fields);
        self.item_id = Some(item_id);
        self.tracker.start_tracking(&self.state);
        info!(%item_id, "item loaded");
    }

    /// Nothing selected: back to idle with an empty buffer.
    pub fn clear(&mut self) {
        self.tracker.stop_tracking();
        self.reconciler.clear();
        self.state.reset(BTreeMap::new());
        if let Some(item_id) = self.item_id.take() {
            debug!(%item_id, "editor cleared");
        }
    }

    /// The Coordinator's save succeeded: the live values become the new
    /// baseline and any review state is dropped.
    pub fn save_completed(&mut self) -> Result<(), EngineError> {
        if !self.tracker.is_tracking() {
            return Err(EngineError::NotTracking);
        }
        self.tracker.rebaseline(&self.state);
        self.reconciler.clear();
        if let Some(item_id) = self.item_id {
            info!(%item_id, "saved values rebaselined");
        }
        Ok(())
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// User edit of a single field (the observed path).
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), EngineError> {
        if self.state.field(name).is_none() {
            return Err(EngineError::UnknownField(name.to_string()));
        }
        self.state.set_field(name, value);
        self.tracker.field_changed(name, &self.state, &self.reconciler);
        Ok(())
    }

    /// Run a programmatic bulk mutation with observation paused. Resumes
    /// and recomputes on every exit path; a panic in `f` is re-raised
    /// after the signal has caught up with the state.
    pub fn bulk_update<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        let guard = self.tracker.pause_scoped();
        let state = &mut self.state;
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || f(state)));
        guard.finish(&self.state, &self.reconciler);
        match outcome {
            Ok(out) => out,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    pub fn pause(&mut self) {
        self.tracker.pause();
    }

    pub fn resume(&mut self) {
        self.tracker.resume(&self.state, &self.reconciler);
    }

    pub fn force_dirty(&mut self) {
        self.tracker.force_dirty(&self.reconciler);
    }

    /// Tracked fields whose live value differs from the baseline.
    pub fn changed_fields(&self) -> Vec<String> {
        self.tracker.changed_fields(&self.state)
    }

    // ========================================================================
    // Staged Import
    // ========================================================================

    pub fn begin_import(&mut self, imported: &ItemDocument) -> Result<Vec<String>, EngineError> {
        if !self.tracker.is_tracking() {
            return Err(EngineError::NotTracking);
        }
        self.reconciler
            .begin_import(imported, &mut self.state, &mut self.tracker)
    }

    pub fn accept_field(&mut self, name: &str) -> Result<(), EngineError> {
        self.reconciler.accept_field(name, &mut self.tracker)
    }

    pub fn reject_field(&mut self, name: &str) -> Result<(), EngineError> {
        self.reconciler
            .reject_field(name, &mut self.state, &mut self.tracker)
    }

    pub fn has_pending_review(&self) -> bool {
        self.reconciler.has_pending_review()
    }

    pub fn review_state(&self, name: &str) -> ReviewState {
        self.reconciler.review_state(name)
    }

    /// Whether the UI should show accept/reject controls for `name`.
    pub fn review_controls_visible(&self, name: &str) -> bool {
        self.reconciler.is_pending(name)
    }

    pub fn pending_fields(&self) -> Vec<String> {
        self.reconciler.pending_fields()
    }

    /// Current live values, e.g. for export or for the save request.
    pub fn export_document(&self) -> ItemDocument {
        self.state
            .field_names()
            .into_iter()
            .filter_map(|name| self.state.field(&name).cloned().map(|v| (name, v)))
            .collect()
    }
}
