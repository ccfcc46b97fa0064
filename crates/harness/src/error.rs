use metaedit_core::{CoreError, ItemId};
use metaedit_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
}
