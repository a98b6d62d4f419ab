pub mod adapter;
pub mod api;
pub mod client;

pub use adapter::BtceAdapter;
pub use api::BtceApi;
pub use client::{BtceClient, BtceConfig};
