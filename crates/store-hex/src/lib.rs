//! store-hex: hexagonal inventory/orders API library (core + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use store_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
