// 缓存模块
// 键值存储抽象、Redis/内存实现，以及会话和限流操作

pub mod keys;
pub mod memory_store;
pub mod operations;
pub mod redis_store;
pub mod store;

pub use memory_store::MemoryStore;
pub use operations::{LoginRateLimiter, SessionStore};
pub use redis_store::RedisStore;
pub use store::{KvStore, StoreError, TTL_MISSING};
