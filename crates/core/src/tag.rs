use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::TagId;

/// One chip in a label-set field.
///
/// The optional `id` takes part in equality: a tag that refers to an
/// existing catalog entity is never equal to freshly typed text with the
/// same display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tag {
    Label {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<TagId>,
    },
    Pair {
        key: String,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<TagId>,
    },
}

impl Tag {
    pub fn label(name: impl Into<String>) -> Self {
        Tag::Label { name: name.into(), id: None }
    }

    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag::Pair { key: key.into(), value: value.into(), id: None }
    }

    pub fn with_id(self, tag_id: TagId) -> Self {
        match self {
            Tag::Label { name, .. } => Tag::Label { name, id: Some(tag_id) },
            Tag::Pair { key, value, .. } => Tag::Pair { key, value, id: Some(tag_id) },
        }
    }

    pub fn id(&self) -> Option<TagId> {
        match self {
            Tag::Label { id, .. } | Tag::Pair { id, .. } => *id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Tag::Label { name, .. } => name.clone(),
            Tag::Pair { key, value, .. } => format!("{key}: {value}"),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
