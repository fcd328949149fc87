/// 缓存操作

// 会话操作
pub mod session;

// 登录限流操作
pub mod rate_limit;

pub use rate_limit::LoginRateLimiter;
pub use session::SessionStore;
