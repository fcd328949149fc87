#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    extract::ConnectInfo,
    http::{Request, Response, header},
};
use form_gate::{
    AppState,
    cache::{KvStore, MemoryStore, StoreError, keys::session_prefix},
    config::Config,
    create_router,
    sink::{AppendOutcome, RecordSink, SinkError},
};
use tower::ServiceExt;

pub const SECRET: &str = "correct-secret";
pub const CLIENT_IP: &str = "203.0.113.10";

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("UNIVERSAL_KEY".into(), SECRET.into());
    vars.insert(
        "STATIC_DIR".into(),
        format!("{}/client", env!("CARGO_MANIFEST_DIR")),
    );
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(move |key| vars.get(key).cloned()).unwrap()
}

/// 记录所有调用的假存储服务
#[derive(Default)]
pub struct RecordingSink {
    pub fail_upload: bool,
    pub uploads: Mutex<Vec<(String, usize)>>,
    pub rows: Mutex<Vec<Vec<String>>>,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn authenticate(&self) -> Result<(), SinkError> {
        Ok(())
    }

    async fn upload_file(&self, data: Bytes, name: &str) -> Result<String, SinkError> {
        if self.fail_upload {
            return Err(SinkError::InvalidResponse("upload quota exceeded".into()));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((name.to_string(), data.len()));
        Ok(format!("https://files.example/{name}"))
    }

    async fn append_row(&self, row: Vec<String>) -> Result<AppendOutcome, SinkError> {
        self.rows.lock().unwrap().push(row);
        Ok(AppendOutcome {
            success: true,
            result: serde_json::json!({"updatedRows": 1}),
        })
    }
}

/// 任何操作都失败的存储
pub struct FailingStore;

#[async_trait]
impl KvStore for FailingStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn ttl(&self, _key: &str) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn del(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn incr_with_window(&self, _key: &str, _window_secs: u64) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// 键在 `exists` 与 `ttl` 之间过期时的存储视图
pub struct ExpiringStore;

#[async_trait]
impl KvStore for ExpiringStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), StoreError> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        Ok(true)
    }

    async fn ttl(&self, _key: &str) -> Result<i64, StoreError> {
        Ok(form_gate::cache::TTL_MISSING)
    }

    async fn del(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn incr_with_window(&self, _key: &str, _window_secs: u64) -> Result<i64, StoreError> {
        Ok(1)
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(test_config(&[]), RecordingSink::default())
    }

    pub fn with_config(overrides: &[(&str, &str)]) -> Self {
        Self::with(test_config(overrides), RecordingSink::default())
    }

    pub fn with(config: Config, sink: RecordingSink) -> Self {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(sink);
        let state = AppState::new(config, store.clone(), sink.clone());
        Self {
            router: create_router(state),
            store,
            sink,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn live_sessions(&self) -> usize {
        self.store.live_keys(session_prefix()).await
    }

    /// 登录成功后返回会话令牌
    pub async fn login(&self) -> String {
        let response = self.send(login_request(SECRET, CLIENT_IP)).await;
        session_cookie(&response).expect("login should set a session cookie")
    }
}

pub fn app_with_store(store: Arc<dyn KvStore>) -> Router {
    let state = AppState::new(test_config(&[]), store, Arc::new(RecordingSink::default()));
    create_router(state)
}

pub fn with_peer(mut request: Request<Body>, ip: &str) -> Request<Body> {
    let addr: SocketAddr = format!("{ip}:40000").parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn login_request(key: &str, ip: &str) -> Request<Body> {
    let request = Request::post("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("key={key}")))
        .unwrap();
    with_peer(request, ip)
}

pub fn get(path: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(sid) = session {
        builder = builder.header(header::COOKIE, format!("auth_session={sid}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post(path: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(path);
    if let Some(sid) = session {
        builder = builder.header(header::COOKIE, format!("auth_session={sid}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// 取出响应里下发的非空会话令牌
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    set_cookies(response).iter().find_map(|cookie| {
        let value = cookie.strip_prefix("auth_session=")?.split(';').next()?;
        (!value.is_empty()).then(|| value.to_string())
    })
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub const BOUNDARY: &str = "form-gate-test-boundary";

/// 构造 multipart 请求体
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"foto_evidence\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn submission_request(session: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::post("/api/append-to-sheet").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(sid) = session {
        builder = builder.header(header::COOKIE, format!("auth_session={sid}"));
    }
    with_peer(builder.body(Body::from(body)).unwrap(), CLIENT_IP)
}
