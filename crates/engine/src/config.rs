use serde::{Deserialize, Serialize};

/// How label-set fields are compared against the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSetEquality {
    /// Strict sequence equality: reordering chips counts as a change.
    #[default]
    Ordered,
    /// Order-insensitive, duplicates still counted.
    Multiset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub label_set_equality: LabelSetEquality,
    /// Fields to track. `None` tracks whatever the state exposes when
    /// tracking starts.
    pub tracked_fields: Option<Vec<String>>,
}

impl EditorConfig {
    pub fn with_label_set_equality(mut self, equality: LabelSetEquality) -> Self {
        self.label_set_equality = equality;
        self
    }

    pub fn with_tracked_fields<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.tracked_fields = Some(names.into_iter().map(Into::into).collect());
        self
    }
}
