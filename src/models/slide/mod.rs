pub mod types;
pub mod queries;
pub mod ordering;

pub use types::*;
pub use queries::*;
pub use ordering::Direction;
