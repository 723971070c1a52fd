mod account_service_impl;
mod history_navigator;
mod request_pipeline;
mod route_guard;
mod session_service_impl;
mod token_codec_impl;
mod token_store;

pub use account_service_impl::*;
pub use history_navigator::*;
pub use request_pipeline::*;
pub use route_guard::*;
pub use session_service_impl::*;
pub use token_codec_impl::*;
pub use token_store::*;
