pub mod account_forms;
pub mod product_form;

pub use account_forms::*;
pub use product_form::*;
