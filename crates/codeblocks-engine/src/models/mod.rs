pub mod block;
pub mod filter;

pub use block::Block;
pub use filter::TypeFilter;
