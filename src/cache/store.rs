use async_trait::async_trait;
use thiserror::Error;

/// 键不存在时 TTL 查询返回的哨兵值（与 Redis `TTL` 语义一致）
pub const TTL_MISSING: i64 = -2;

/// 键存在但没有过期时间
pub const TTL_PERSISTENT: i64 = -1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// 会话与限流所需的最小键值存储接口，每个操作都是一次原子往返
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// 剩余秒数；键不存在返回 [`TTL_MISSING`]，无过期返回 [`TTL_PERSISTENT`]
    async fn ttl(&self, key: &str) -> Result<i64, StoreError>;

    async fn del(&self, key: &str) -> Result<(), StoreError>;

    /// 计数加一，创建键的那次自增同时设置窗口过期时间；返回自增后的值
    async fn incr_with_window(&self, key: &str, window_secs: u64) -> Result<i64, StoreError>;
}
