// store

mod key_value_store;

pub use key_value_store::*;

// remote

mod auth_gateway;
mod http_transport;

pub use auth_gateway::*;
pub use http_transport::*;

// ui

mod navigator;

pub use navigator::*;
