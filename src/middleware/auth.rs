use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{AppState, error::AppError, utils::found};

/// 会话 Cookie 名
pub const SESSION_COOKIE: &str = "auth_session";

/// 从 Cookie 中取会话令牌，空值视为没有
pub fn session_id(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}

/// 受保护路由的鉴权中间件
///
/// 会话无效时 `/api` 及其子路径返回 401 JSON，页面路径重定向到登录页；
/// 存储故障作为 500 返回，不当成未登录。
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let valid = match session_id(&jar) {
        Some(sid) => state.sessions.is_valid(sid).await?,
        None => false,
    };
    if valid {
        return Ok(next.run(request).await);
    }

    // 嵌套路由会剥掉前缀，按原始路径判断
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path())
        .unwrap_or_else(|| request.uri().path());

    if path == "/api" || path.starts_with("/api/") {
        Err(AppError::Unauthorized)
    } else {
        tracing::debug!("no valid session for {}, redirecting to login", path);
        Ok(found("/login").into_response())
    }
}
