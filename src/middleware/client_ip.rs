use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use crate::AppState;

/// 登录限流使用的客户端 IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

/// 解析客户端 IP
///
/// 默认只用连接对端地址；部署在可信反向代理后面时才读取
/// `x-real-ip` / `x-forwarded-for`。`x-forwarded-for` 取最右侧的非空项，
/// 即代理追加的对端地址，左侧各项由客户端控制。
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> String {
    let remote_ip = peer.map(|addr| addr.ip().to_string());

    let forwarded = if trust_proxy_headers {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .filter(|ip| !ip.trim().is_empty())
            .or_else(|| {
                headers
                    .get("x-forwarded-for")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.rsplit(',').find(|ip| !ip.trim().is_empty()))
            })
    } else {
        None
    };

    forwarded
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        Ok(ClientIp(resolve_client_ip(
            &parts.headers,
            peer,
            state.config.trust_proxy_headers,
        )))
    }
}
