
pub mod types;
pub mod padding;
pub mod iv;
pub mod block;

pub use types::*;
pub use padding::*;
pub use iv::*;
pub use block::*;
