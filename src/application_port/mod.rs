mod account_service;
mod api_client;
mod session_service;
mod token_codec;

pub use account_service::*;
pub use api_client::*;
pub use session_service::*;
pub use token_codec::*;
