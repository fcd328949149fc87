use std::path::PathBuf;

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{AppState, middleware::session_id, utils::found};

pub const LOGIN_PAGE: &str = "login.html";
pub const LOADING_PAGE: &str = "loading.html";
pub const FORM_PAGE: &str = "index.html";

/// 返回静态目录中的单个文件
pub async fn serve_static(path: PathBuf, request: Request) -> Response {
    ServeFile::new(path)
        .oneshot(request)
        .await
        .map(IntoResponse::into_response)
        .unwrap_or_else(|never| match never {})
}

/// 根路由：没有 Cookie 给登录页；有 Cookie（不论是否有效）给加载页，
/// 由页面脚本调用 `/auth/check` 决定去向
pub async fn root(State(state): State<AppState>, jar: CookieJar, request: Request) -> Response {
    let page = if session_id(&jar).is_some() {
        LOADING_PAGE
    } else {
        LOGIN_PAGE
    };
    serve_static(state.config.static_dir.join(page), request).await
}

pub async fn login_page(State(state): State<AppState>, request: Request) -> Response {
    serve_static(state.config.static_dir.join(LOGIN_PAGE), request).await
}

/// `/index.html`、`/loading.html` 一律回到根路由，不直接暴露文件
pub async fn redirect_to_root() -> Response {
    found("/")
}
