mod tracing;
pub mod types;

pub use tracing::init_tracing;
pub use types::*;
