pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod notice;
pub mod services;
pub mod views;

pub use error::{ClientError, ClientResult};
