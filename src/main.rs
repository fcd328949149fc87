use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use form_gate::{
    AppState,
    cache::{KvStore, RedisStore},
    config::Config,
    create_router,
    sink::{HttpRecordSink, RecordSink, UnconfiguredSink},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置 Redis 存储
    let store = Arc::new(RedisStore::open(&config.redis_url).expect("Invalid REDIS_URL"));

    // 启动时探测一次，失败不退出，运行期的存储错误会以 500 返回
    match store.ping().await {
        Ok(()) => tracing::info!("Connected to Redis at {}", config.redis_url),
        Err(e) => tracing::warn!("Redis ping failed at startup, continuing: {}", e),
    }

    let sink: Arc<dyn RecordSink> = match &config.record_sink_url {
        Some(url) => Arc::new(HttpRecordSink::new(
            url.clone(),
            config.record_sink_token.clone(),
        )),
        None => {
            tracing::warn!("RECORD_SINK_URL is not set, submissions will fail with 502");
            Arc::new(UnconfiguredSink)
        }
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to 127.0.0.1");
            IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
        }),
        config.server_port,
    );

    // 设置应用状态
    let state = AppState::new(config, store, sink);
    let app = create_router(state);

    // 启动服务器
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
