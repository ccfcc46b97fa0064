use std::collections::BTreeMap;

use metaedit_core::FieldValue;

use crate::{
    config::{EditorConfig, LabelSetEquality},
    item_state::EditableItemState,
};

/// A field missing from either side compares as `Null`.
static NULL: FieldValue = FieldValue::Null;

/// Immutable deep copy of every tracked field at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: BTreeMap<String, FieldValue>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Captures snapshots and answers "does this live field still match".
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    equality: LabelSetEquality,
    tracked_fields: Option<Vec<String>>,
}

impl SnapshotStore {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            equality: config.label_set_equality,
            tracked_fields: config.tracked_fields.clone(),
        }
    }

    pub fn capture<S: EditableItemState + ?Sized>(&self, state: &S) -> Snapshot {
        let names = match &self.tracked_fields {
            Some(names) => names.clone(),
            None => state.field_names(),
        };
        let values = names
            .into_iter()
            .map(|name| {
                // Tags are immutable values, so cloning the Vec is the whole deep copy.
                let value = state.field(&name).cloned().unwrap_or(FieldValue::Null);
                (name, value)
            })
            .collect();
        Snapshot { values }
    }

    pub fn equals<S: EditableItemState + ?Sized>(
        &self,
        snapshot: &Snapshot,
        name: &str,
        live: &S,
    ) -> bool {
        let captured = snapshot.get(name).unwrap_or(&NULL);
        let current = live.field(name).unwrap_or(&NULL);
        self.values_equal(captured, current)
    }

    pub fn values_equal(&self, a: &FieldValue, b: &FieldValue) -> bool {
        match self.equality {
            LabelSetEquality::Ordered => a == b,
            LabelSetEquality::Multiset => a.eq_unordered(b),
        }
    }

    /// Names of snapshot fields whose live value no longer matches.
    pub fn changed_fields<S: EditableItemState + ?Sized>(
        &self,
        snapshot: &Snapshot,
        live: &S,
    ) -> Vec<String> {
        snapshot
            .field_names()
            .filter(|name| !self.equals(snapshot, name, live))
            .map(str::to_string)
            .collect()
    }
}
