pub mod category;
pub mod filter;

pub use category::*;
pub use filter::*;
