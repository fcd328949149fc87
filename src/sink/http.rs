use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use super::{AppendOutcome, RecordSink, SinkError};

/// 通过 HTTP 桥接服务写入存储和表格
///
/// - `GET  {base}/health`       鉴权检查
/// - `POST {base}/files?name=`  上传文件，返回 `{"link": "..."}`
/// - `POST {base}/rows`         追加行 `{"values": [[...]]}`
pub struct HttpRecordSink {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    link: String,
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    values: [&'a [String]; 1],
}

impl HttpRecordSink {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl RecordSink for HttpRecordSink {
    async fn authenticate(&self) -> Result<(), SinkError> {
        self.request(reqwest::Method::GET, "/health")
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn upload_file(&self, data: Bytes, name: &str) -> Result<String, SinkError> {
        let response = self
            .request(reqwest::Method::POST, "/files")
            .query(&[("name", name)])
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(data)
            .send()
            .await?
            .error_for_status()?;

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| SinkError::InvalidResponse(e.to_string()))?;
        Ok(upload.link)
    }

    async fn append_row(&self, row: Vec<String>) -> Result<AppendOutcome, SinkError> {
        let response = self
            .request(reqwest::Method::POST, "/rows")
            .json(&AppendRequest { values: [&row] })
            .send()
            .await?;

        let success = response.status().is_success();
        let result = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        Ok(AppendOutcome { success, result })
    }
}
