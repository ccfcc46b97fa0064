use std::collections::BTreeMap;

use metaedit_core::{FieldValue, ItemDocument};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::EngineError,
    item_state::EditableItemState,
    tracker::{DirtyTracker, ReviewGate},
};

/// Per-field review state of a staged import. A rejected field goes
/// straight back to `NotStaged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    NotStaged,
    PendingReview,
    Accepted,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStaged => "not_staged",
            Self::PendingReview => "pending_review",
            Self::Accepted => "accepted",
        }
    }
}

/// Stages imported values onto the live state for field-by-field review.
///
/// Keeps its own pre-import values, separate from the tracker's
/// baseline: the baseline answers "differs from last save", the
/// pre-import value answers "what does reject restore".
#[derive(Debug, Default)]
pub struct ImportReconciler {
    fields: BTreeMap<String, ReviewState>,
    pre_import: BTreeMap<String, FieldValue>,
}

impl ReviewGate for ImportReconciler {
    fn has_pending_review(&self) -> bool {
        self.fields.values().any(|s| *s == ReviewState::PendingReview)
    }
}

impl ImportReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending_review(&self) -> bool {
        ReviewGate::has_pending_review(self)
    }

    pub fn review_state(&self, name: &str) -> ReviewState {
        self.fields.get(name).copied().unwrap_or(ReviewState::NotStaged)
    }

    /// Drives the per-field accept/reject controls.
    pub fn is_pending(&self, name: &str) -> bool {
        self.review_state(name) == ReviewState::PendingReview
    }

    pub fn pending_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, s)| **s == ReviewState::PendingReview)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Value `reject_field` would restore for `name`.
    pub fn pre_import_value(&self, name: &str) -> Option<&FieldValue> {
        self.pre_import.get(name)
    }

    /// Overwrite the live fields with `imported` and mark each one
    /// pending review. Returns the staged field names.
    ///
    /// Every name is validated before anything is written. A field that
    /// is already pending keeps its original pre-import value.
    #[instrument(skip_all, fields(fields = imported.len()))]
    pub fn begin_import<S: EditableItemState + ?Sized>(
        &mut self,
        imported: &ItemDocument,
        state: &mut S,
        tracker: &mut DirtyTracker,
    ) -> Result<Vec<String>, EngineError> {
        if let Some(name) = imported.fields.keys().find(|name| state.field(name).is_none()) {
            return Err(EngineError::UnknownField(name.clone()));
        }
        if imported.is_empty() {
            return Ok(Vec::new());
        }

        let guard = tracker.pause_scoped();
        let mut staged = Vec::with_capacity(imported.len());
        for (name, value) in &imported.fields {
            if !self.is_pending(name) {
                let current = state.field(name).cloned().unwrap_or(FieldValue::Null);
                self.pre_import.insert(name.clone(), current);
            }
            debug!(field = %name, kind = value.kind().as_str(), "field staged");
            state.set_field(name, value.clone());
            self.fields.insert(name.clone(), ReviewState::PendingReview);
            staged.push(name.clone());
        }
        guard.finish(&*state, &*self);

        info!(staged = staged.len(), "import staged for review");
        Ok(staged)
    }

    /// Keep the imported value. Enables Save even if the value happens to
    /// equal the baseline, since the decision itself is the edit.
    pub fn accept_field(
        &mut self,
        name: &str,
        tracker: &mut DirtyTracker,
    ) -> Result<(), EngineError> {
        self.require_pending(name)?;
        self.fields.insert(name.to_string(), ReviewState::Accepted);
        self.pre_import.remove(name);
        tracker.force_dirty(&*self);
        info!(field = name, "imported value accepted");
        Ok(())
    }

    /// Restore the value the field held right before the import.
    pub fn reject_field<S: EditableItemState + ?Sized>(
        &mut self,
        name: &str,
        state: &mut S,
        tracker: &mut DirtyTracker,
    ) -> Result<(), EngineError> {
        self.require_pending(name)?;
        let previous = self.pre_import.remove(name).unwrap_or(FieldValue::Null);

        let guard = tracker.pause_scoped();
        state.set_field(name, previous);
        self.fields.remove(name);
        guard.finish(&*state, &*self);

        info!(field = name, "imported value rejected");
        Ok(())
    }

    /// Drop all review state and pre-import values.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.pre_import.clear();
    }

    fn require_pending(&self, name: &str) -> Result<(), EngineError> {
        match self.review_state(name) {
            ReviewState::PendingReview => Ok(()),
            state => {
                warn!(field = name, state = state.as_str(), "field is not pending review");
                Err(EngineError::InvalidReconciliationState {
                    field: name.to_string(),
                    state,
                })
            }
        }
    }
}
