//! 进程内存储，仅用于测试和本地调试。
//!
//! 过期判断使用 `tokio::time::Instant`，在暂停时钟的测试中可以用
//! `tokio::time::advance` 推进。

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::store::{KvStore, StoreError, TTL_MISSING, TTL_PERSISTENT};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前未过期的键数量
    pub async fn live_keys(&self, prefix: &str) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.is_live(now))
            .count()
    }
}

fn purge_if_expired(entries: &mut HashMap<String, Entry>, key: &str, now: Instant) {
    if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
        entries.remove(key);
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key, now);
        Ok(entries.contains_key(key))
    }

    async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key, now);
        let ttl = match entries.get(key) {
            None => TTL_MISSING,
            Some(Entry { expires_at: None, .. }) => TTL_PERSISTENT,
            // 不足一秒按 0 计
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => at.duration_since(now).as_secs() as i64,
        };
        Ok(ttl)
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn incr_with_window(&self, key: &str, window_secs: u64) -> Result<i64, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        purge_if_expired(&mut entries, key, now);

        match entries.get_mut(key) {
            Some(entry) => {
                let count = entry
                    .value
                    .parse::<i64>()
                    .map_err(|_| StoreError::Unavailable(format!("{key} is not an integer")))?
                    + 1;
                entry.value = count.to_string();
                Ok(count)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: "1".to_string(),
                        expires_at: Some(now + Duration::from_secs(window_secs)),
                    },
                );
                Ok(1)
            }
        }
    }
}
