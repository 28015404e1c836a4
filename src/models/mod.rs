pub mod account;
pub mod cart;
pub mod product;
pub mod responses;

pub use account::*;
pub use cart::*;
pub use product::*;
pub use responses::*;
