pub mod branching;
pub mod operand;
pub mod priority;
pub mod section;
pub mod types;

pub use branching::*;
pub use operand::*;
pub use section::*;
pub use types::*;
