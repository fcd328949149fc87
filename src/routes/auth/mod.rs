mod handler;
mod model;

pub use handler::{LOGIN_FAILURE_DELAY, check, login, logout, removal_cookie, session_cookie};
pub use model::{CheckSessionResponse, LoginRequest};
