mod auth;
mod client_ip;
mod error_handler;

pub use auth::{SESSION_COOKIE, require_session, session_id};
pub use client_ip::{ClientIp, resolve_client_ip};
pub use error_handler::{handle_panic, log_errors};
