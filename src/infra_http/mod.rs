mod http_auth_gateway;
mod reqwest_transport;

pub use http_auth_gateway::*;
pub use reqwest_transport::*;
