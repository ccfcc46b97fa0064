use serde::{Deserialize, Serialize};

use crate::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    LabelSet,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::LabelSet => "label_set",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Dates travel as text; the editor never interprets them.
    Date(String),
    Labels(Vec<Tag>),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b).is_eq(),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Labels(a), Self::Labels(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Labels(_) => FieldKind::LabelSet,
            _ => FieldKind::Scalar,
        }
    }

    /// Equality that ignores chip order but still counts duplicates.
    /// Scalars fall back to plain equality.
    pub fn eq_unordered(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Labels(a), Self::Labels(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let mut a: Vec<&Tag> = a.iter().collect();
                let mut b: Vec<&Tag> = b.iter().collect();
                a.sort();
                b.sort();
                a == b
            }
            _ => self == other,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<Vec<Tag>> for FieldValue {
    fn from(tags: Vec<Tag>) -> Self {
        FieldValue::Labels(tags)
    }
}
