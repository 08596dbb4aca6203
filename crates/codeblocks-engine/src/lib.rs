pub mod extract;
pub mod io;
pub mod models;

// Re-export key types for easier usage
pub use extract::{Blocks, DocKind, ExtractError, extract};
pub use models::{Block, TypeFilter};
