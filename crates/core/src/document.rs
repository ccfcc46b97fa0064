use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::CoreError, field_value::FieldValue};

/// A parsed item snapshot: field name to value.
///
/// This is both what the catalog hands back on load and what an import
/// file decodes into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDocument {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ItemDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let doc: Self = serde_json::from_str(json)?;
        if let Some(name) = doc.fields.keys().find(|k| k.trim().is_empty()) {
            return Err(CoreError::InvalidData(format!("blank field name {name:?}")));
        }
        Ok(doc)
    }
}

impl From<BTreeMap<String, FieldValue>> for ItemDocument {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, FieldValue)> for ItemDocument {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}
