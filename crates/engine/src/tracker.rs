use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::{
    item_state::EditableItemState,
    snapshot::{Snapshot, SnapshotStore},
};

/// Whether an import is still waiting on the user.
///
/// While this reports true the dirty signal is held at false.
pub trait ReviewGate {
    fn has_pending_review(&self) -> bool;
}

pub type DirtyListener = Box<dyn FnMut(bool)>;

/// Computes the "unsaved changes" signal by comparing live state against
/// the baseline snapshot.
///
/// Observation is modelled as a set of subscribed field names: tracking
/// subscribes every baseline field, pausing drops the subscriptions and
/// resuming restores them.
pub struct DirtyTracker {
    store: SnapshotStore,
    baseline: Option<Snapshot>,
    observed: BTreeSet<String>,
    paused: bool,
    /// `force_dirty` arrived while paused; applied on resume.
    force_deferred: bool,
    dirty: bool,
    listener: Option<DirtyListener>,
}

impl DirtyTracker {
    pub fn new(store: SnapshotStore) -> Self {
        Self {
            store,
            baseline: None,
            observed: BTreeSet::new(),
            paused: false,
            force_deferred: false,
            dirty: false,
            listener: None,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn baseline(&self) -> Option<&Snapshot> {
        self.baseline.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_observing(&self, name: &str) -> bool {
        self.observed.contains(name)
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Register the callback fired whenever the dirty signal flips.
    pub fn set_listener(&mut self, listener: DirtyListener) {
        self.listener = Some(listener);
    }

    /// Capture the baseline and start observing. Call after the UI has
    /// been populated with the loaded values.
    pub fn start_tracking<S: EditableItemState + ?Sized>(&mut self, state: &S) {
        let baseline = self.store.capture(state);
        self.observed = baseline.field_names().map(str::to_string).collect();
        debug!(fields = baseline.len(), "tracking started");
        self.baseline = Some(baseline);
        self.paused = false;
        self.force_deferred = false;
        self.set_dirty(false);
    }

    pub fn stop_tracking(&mut self) {
        if self.baseline.take().is_some() {
            debug!("tracking stopped");
        }
        self.observed.clear();
        self.paused = false;
        self.force_deferred = false;
        self.set_dirty(false);
    }

    pub fn pause(&mut self) {
        if self.paused {
            warn!("pause called while already paused; ignoring");
            return;
        }
        self.paused = true;
        self.observed.clear();
    }

    pub fn resume<S, G>(&mut self, state: &S, gate: &G)
    where
        S: EditableItemState + ?Sized,
        G: ReviewGate + ?Sized,
    {
        if !self.paused {
            warn!("resume called while not paused; ignoring");
            return;
        }
        self.release_pause();
        self.recompute(state, gate);
        if self.force_deferred {
            self.force_deferred = false;
            self.force_dirty(gate);
        }
    }

    /// Pause until the returned guard is finished or dropped.
    ///
    /// Holding the guard borrows the tracker, so nothing else can reach
    /// the observed-mutation path while the bulk update runs. If the
    /// tracker was already paused the guard leaves that pause in place.
    pub fn pause_scoped(&mut self) -> PauseGuard<'_> {
        let owns_pause = !self.paused;
        if owns_pause {
            self.pause();
        }
        PauseGuard { tracker: Some(self), owns_pause }
    }

    /// Re-attach observation without recomputing.
    fn release_pause(&mut self) {
        self.paused = false;
        if let Some(baseline) = &self.baseline {
            self.observed = baseline.field_names().map(str::to_string).collect();
        }
    }

    /// Observed-mutation entry point.
    pub fn field_changed<S, G>(&mut self, name: &str, state: &S, gate: &G)
    where
        S: EditableItemState + ?Sized,
        G: ReviewGate + ?Sized,
    {
        if !self.observed.contains(name) {
            return;
        }
        self.recompute(state, gate);
    }

    pub fn recompute<S, G>(&mut self, state: &S, gate: &G)
    where
        S: EditableItemState + ?Sized,
        G: ReviewGate + ?Sized,
    {
        let differs = match &self.baseline {
            None => false,
            Some(_) if gate.has_pending_review() => false,
            Some(baseline) => baseline
                .field_names()
                .any(|name| !self.store.equals(baseline, name, state)),
        };
        self.set_dirty(differs);
    }

    /// Turn the signal on regardless of the comparison, until the next
    /// recompute. Deferred to `resume` while paused; held off while any
    /// field is pending review.
    pub fn force_dirty<G: ReviewGate + ?Sized>(&mut self, gate: &G) {
        if !self.is_tracking() {
            warn!("force_dirty called while not tracking; ignoring");
            return;
        }
        if self.paused {
            debug!("force_dirty deferred until resume");
            self.force_deferred = true;
            return;
        }
        self.set_dirty(!gate.has_pending_review());
    }

    /// Make the current live values the new "no changes" reference.
    pub fn rebaseline<S: EditableItemState + ?Sized>(&mut self, state: &S) {
        if !self.is_tracking() {
            warn!("rebaseline called while not tracking; ignoring");
            return;
        }
        let baseline = self.store.capture(state);
        if !self.paused {
            self.observed = baseline.field_names().map(str::to_string).collect();
        }
        debug!(fields = baseline.len(), "baseline recaptured");
        self.baseline = Some(baseline);
        self.force_deferred = false;
        self.set_dirty(false);
    }

    /// Fields that differ from the baseline right now.
    pub fn changed_fields<S: EditableItemState + ?Sized>(&self, state: &S) -> Vec<String> {
        match &self.baseline {
            Some(baseline) => self.store.changed_fields(baseline, state),
            None => Vec::new(),
        }
    }

    fn set_dirty(&mut self, dirty: bool) {
        if self.dirty == dirty {
            return;
        }
        self.dirty = dirty;
        debug!(dirty, "dirty signal changed");
        if let Some(listener) = self.listener.as_mut() {
            listener(dirty);
        }
    }
}

/// Scoped pause returned by [`DirtyTracker::pause_scoped`].
pub struct PauseGuard<'a> {
    tracker: Option<&'a mut DirtyTracker>,
    owns_pause: bool,
}

impl PauseGuard<'_> {
    /// Resume and recompute against the mutated state.
    pub fn finish<S, G>(mut self, state: &S, gate: &G)
    where
        S: EditableItemState + ?Sized,
        G: ReviewGate + ?Sized,
    {
        if let Some(tracker) = self.tracker.take() {
            if self.owns_pause {
                tracker.resume(state, gate);
            }
        }
    }
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        // Only reached without `finish`, i.e. while unwinding. Observation
        // comes back; the caller recomputes if it can.
        if let Some(tracker) = self.tracker.take() {
            if self.owns_pause {
                tracker.release_pause();
            }
        }
    }
}
