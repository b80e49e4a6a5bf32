//! HTTP request handlers.

pub mod auth_handler;
pub mod session_handler;

pub use auth_handler::auth_routes;
pub use session_handler::session_routes;
