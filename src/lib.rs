use std::sync::Arc;

use cache::{KvStore, LoginRateLimiter, SessionStore};
use config::Config;
use sink::RecordSink;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sink;
pub mod utils;

pub use router::create_router;

/// 请求处理共享的上下文，所有会话状态都在外部存储里
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub login_limiter: LoginRateLimiter,
    pub sink: Arc<dyn RecordSink>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KvStore>, sink: Arc<dyn RecordSink>) -> Self {
        let login_limiter = LoginRateLimiter::new(
            store.clone(),
            config.login_rate_limit,
            config.rate_limit_window(),
        );
        Self {
            config: Arc::new(config),
            sessions: SessionStore::new(store),
            login_limiter,
            sink,
        }
    }
}
