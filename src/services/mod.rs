pub mod auth;
pub mod buyer;
pub mod cart;
pub mod farmer;
pub mod in_flight;

pub use auth::AuthService;
pub use buyer::BuyerService;
pub use cart::CartService;
pub use farmer::FarmerService;
pub use in_flight::{InFlightGuard, InFlightSet};
