use std::sync::Arc;
use std::time::Duration;

use crate::cache::keys::login_rate_limit_key;
use crate::cache::store::{KvStore, StoreError};

/// 登录限流：按客户端 IP 的固定窗口计数
///
/// 成功和失败的登录都计入同一个计数器。
#[derive(Clone)]
pub struct LoginRateLimiter {
    store: Arc<dyn KvStore>,
    limit: u32,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(store: Arc<dyn KvStore>, limit: u32, window: Duration) -> Self {
        Self {
            store,
            limit,
            window,
        }
    }

    /// 计数加一，自增后的计数不超过上限时放行
    pub async fn allow(&self, client_ip: &str) -> Result<bool, StoreError> {
        let key = login_rate_limit_key(client_ip);
        let count = self
            .store
            .incr_with_window(&key, self.window.as_secs())
            .await?;
        Ok(count <= i64::from(self.limit))
    }
}
