use std::sync::Arc;
use std::time::Duration;

use crate::cache::keys::session_key;
use crate::cache::store::{KvStore, StoreError, TTL_MISSING};
use crate::utils::generate_session_token;

/// 会话存储
///
/// 会话只有“键是否存在”一个属性：键存在即有效，过期由存储端负责。
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KvStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// 创建会话并返回令牌
    pub async fn create(&self, ttl: Duration) -> Result<String, StoreError> {
        let session_id = generate_session_token();
        self.store
            .set_ex(&session_key(&session_id), "1", ttl.as_secs())
            .await?;
        Ok(session_id)
    }

    /// 空令牌直接判为无效，不访问存储
    pub async fn is_valid(&self, session_id: &str) -> Result<bool, StoreError> {
        if session_id.is_empty() {
            return Ok(false);
        }
        self.store.exists(&session_key(session_id)).await
    }

    /// 剩余有效秒数，不存在时返回 [`TTL_MISSING`]
    pub async fn remaining_ttl(&self, session_id: &str) -> Result<i64, StoreError> {
        if session_id.is_empty() {
            return Ok(TTL_MISSING);
        }
        self.store.ttl(&session_key(session_id)).await
    }

    /// 删除会话，不存在时什么也不做
    pub async fn delete(&self, session_id: &str) -> Result<(), StoreError> {
        if session_id.is_empty() {
            return Ok(());
        }
        self.store.del(&session_key(session_id)).await
    }
}
