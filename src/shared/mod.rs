pub mod errors;
pub mod pagination;
pub mod shutdown;

pub use errors::*;
pub use pagination::*;
