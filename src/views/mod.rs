pub mod cart;
pub mod product_list;

pub use cart::{CartViewModel, QuantityChange};
pub use product_list::ProductListViewModel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}
