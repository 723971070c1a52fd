mod account;
mod claims;
mod credential;
mod route;
mod session;

pub use account::*;
pub use claims::*;
pub use credential::*;
pub use route::*;
pub use session::*;
