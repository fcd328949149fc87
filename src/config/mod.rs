use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// 登录限流窗口，固定 60 秒
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub universal_key: String,
    pub session_ttl_secs: u64,
    pub https_cookies: bool,
    pub redis_url: String,
    pub login_rate_limit: u32,
    pub server_host: String,
    pub server_port: u16,
    pub static_dir: PathBuf,
    pub trust_proxy_headers: bool,
    pub record_sink_url: Option<String>,
    pub record_sink_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源解析配置，数值解析失败时回退到默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let universal_key = lookup("UNIVERSAL_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("UNIVERSAL_KEY"))?;

        let parse_or = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };
        let flag = |key: &str| parse_or(key, 0) == 1;
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            universal_key,
            // SETEX 不接受 0，Cookie Max-Age 需要能放进 i64
            session_ttl_secs: Some(parse_or("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL_SECS))
                .filter(|ttl| (1..=i64::MAX as u64).contains(ttl))
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            https_cookies: flag("HTTPS_COOKIES"),
            redis_url: non_empty("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            login_rate_limit: u32::try_from(parse_or("API_RATE_LIMIT", 8)).unwrap_or(8),
            server_host: non_empty("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: u16::try_from(parse_or("SERVER_PORT", 8945)).unwrap_or(8945),
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("client")),
            trust_proxy_headers: flag("TRUST_PROXY_HEADERS"),
            record_sink_url: non_empty("RECORD_SINK_URL"),
            record_sink_token: non_empty("RECORD_SINK_TOKEN"),
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(RATE_LIMIT_WINDOW_SECS)
    }
}
