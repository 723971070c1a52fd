mod auth_gateway_fake;
mod http_transport_fake;

pub use auth_gateway_fake::*;
pub use http_transport_fake::*;
