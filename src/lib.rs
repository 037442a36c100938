pub mod console;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod models;
pub mod navigator;
pub mod services;
pub mod store;
pub mod view;

pub use navigator::{Applied, BrowseState, BrowserSnapshot, Navigator};
