pub mod catalog;
pub mod coordinator;
pub mod error;

pub use catalog::TestCatalog;
pub use coordinator::TestEditor;
pub use error::HarnessError;

use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
