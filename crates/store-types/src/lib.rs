//! store-types: domain entities and repository ports shared by the adapters.

pub mod domain;
pub mod ports;
