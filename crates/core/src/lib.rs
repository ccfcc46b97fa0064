pub mod document;
pub mod error;
pub mod field_value;
pub mod ids;
pub mod tag;

pub use document::ItemDocument;
pub use error::CoreError;
pub use field_value::{FieldKind, FieldValue};
pub use ids::*;
pub use tag::Tag;
