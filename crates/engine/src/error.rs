use metaedit_core::CoreError;
use thiserror::Error;

use crate::reconciler::ReviewState;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("field {field} is not pending review (state: {})", .state.as_str())]
    InvalidReconciliationState { field: String, state: ReviewState },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("no item is being tracked")]
    NotTracking,
}
