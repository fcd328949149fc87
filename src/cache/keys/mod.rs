/// 会话键前缀
const SESSION_PREFIX: &str = "sess:";

/// 登录限流键前缀
const LOGIN_RATE_LIMIT_PREFIX: &str = "rl:login:";

/// 生成会话键
pub fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, session_id)
}

/// 生成登录限流键，空 IP 归入 `unknown`
pub fn login_rate_limit_key(client_ip: &str) -> String {
    let ip = if client_ip.is_empty() { "unknown" } else { client_ip };
    format!("{}{}", LOGIN_RATE_LIMIT_PREFIX, ip)
}

pub fn session_prefix() -> &'static str {
    SESSION_PREFIX
}
