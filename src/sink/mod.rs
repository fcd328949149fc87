//! 外部存储/表格服务的窄接口。
//!
//! 网关只在鉴权通过后调用这里：先 `authenticate`，再上传图片拿到公开链接，
//! 最后追加一行记录。

mod http;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

pub use http::HttpRecordSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("record sink is not configured")]
    NotConfigured,
    #[error("record sink request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("record sink returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// 追加行的结果
#[derive(Debug, Clone)]
pub struct AppendOutcome {
    pub success: bool,
    pub result: serde_json::Value,
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn authenticate(&self) -> Result<(), SinkError>;

    /// 上传文件，返回公开访问链接
    async fn upload_file(&self, data: Bytes, name: &str) -> Result<String, SinkError>;

    async fn append_row(&self, row: Vec<String>) -> Result<AppendOutcome, SinkError>;
}

/// 未配置 `RECORD_SINK_URL` 时使用，所有调用都失败
pub struct UnconfiguredSink;

#[async_trait]
impl RecordSink for UnconfiguredSink {
    async fn authenticate(&self) -> Result<(), SinkError> {
        Err(SinkError::NotConfigured)
    }

    async fn upload_file(&self, _data: Bytes, _name: &str) -> Result<String, SinkError> {
        Err(SinkError::NotConfigured)
    }

    async fn append_row(&self, _row: Vec<String>) -> Result<AppendOutcome, SinkError> {
        Err(SinkError::NotConfigured)
    }
}
