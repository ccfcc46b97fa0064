use std::collections::BTreeMap;

use metaedit_core::FieldValue;

/// The mutable edit buffer the UI binds to.
///
/// Implementations only store values. Change notification is the
/// editor's job: every mutation that should be observed goes through
/// [`crate::Editor::set_field`], which forwards it to the tracker.
pub trait EditableItemState {
    fn field_names(&self) -> Vec<String>;

    fn field(&self, name: &str) -> Option<&FieldValue>;

    /// Update an existing field. Unknown names are ignored.
    fn set_field(&mut self, name: &str, value: FieldValue);

    /// Replace every field at once ("set all").
    fn reset(&mut self, fields: BTreeMap<String, FieldValue>);
}

/// In-memory edit buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemState {
    fields: BTreeMap<String, FieldValue>,
}

impl ItemState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditableItemState for ItemState {
    fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) {
        // Names come from the loaded document; the editor rejects any other.
        if let Some(slot) = self.fields.get_mut(name) {
            *slot = value;
        }
    }

    fn reset(&mut self, fields: BTreeMap<String, FieldValue>) {
        self.fields = fields;
    }
}
