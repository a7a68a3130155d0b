pub mod auth;
pub mod logging;

pub use auth::{AuthContext, require_auth};
pub use logging::logging_middleware;
