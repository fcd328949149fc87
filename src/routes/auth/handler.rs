use std::time::Duration;

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

use crate::{
    AppState,
    cache::TTL_MISSING,
    config::Config,
    error::AppError,
    middleware::{ClientIp, SESSION_COOKIE, session_id},
    utils::{found, secrets_match},
};

use super::model::{CheckSessionResponse, LoginRequest};

/// 密钥错误时的固定延迟
pub const LOGIN_FAILURE_DELAY: Duration = Duration::from_millis(400);

pub fn session_cookie(session_id: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.https_cookies)
        .path("/")
        .max_age(time::Duration::seconds(
            i64::try_from(config.session_ttl_secs).unwrap_or(i64::MAX),
        ))
        .build()
}

/// 清除会话 Cookie（Max-Age=0），请求里没有 Cookie 时也照样下发
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> Result<(CookieJar, Response), AppError> {
    // 成功和失败的尝试都计数
    if !state.login_limiter.allow(&client_ip).await? {
        tracing::warn!(%client_ip, "login rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    if !secrets_match(&req.key, &state.config.universal_key) {
        tracing::warn!(%client_ip, "login rejected: wrong access key");
        tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
        return Err(AppError::BadCredential);
    }

    let sid = state.sessions.create(state.config.session_ttl()).await?;
    tracing::info!(%client_ip, "session issued");

    Ok((jar.add(session_cookie(sid, &state.config)), found("/")))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    if let Some(sid) = session_id(&jar) {
        state.sessions.delete(sid).await?;
    }

    Ok((jar.add(removal_cookie()), found("/")))
}

// debug_handler omitted: its generated helper collides with the name `check`
pub async fn check(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    // 只查一次 TTL，避免判定与读取之间键恰好过期
    let ttl = match session_id(&jar) {
        Some(sid) => state.sessions.remaining_ttl(sid).await?,
        None => TTL_MISSING,
    };
    if ttl != TTL_MISSING {
        return Ok(Json(CheckSessionResponse {
            ok: true,
            ttl: Some(ttl),
        })
        .into_response());
    }

    Ok((
        StatusCode::UNAUTHORIZED,
        Json(CheckSessionResponse {
            ok: false,
            ttl: None,
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(https_cookies: bool) -> Config {
        Config::from_lookup(|key| match key {
            "UNIVERSAL_KEY" => Some("k".to_string()),
            "HTTPS_COOKIES" if https_cookies => Some("1".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), &config(false));
        assert_eq!(cookie.name(), "auth_session");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1800)));

        assert_eq!(session_cookie("tok".to_string(), &config(true)).secure(), Some(true));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
