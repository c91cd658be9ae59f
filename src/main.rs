use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use files_manager::{
    AppState,
    cache::{KeyValueCache, RedisClient},
    config::Config,
    database::{DbClient, DocumentStore},
    router::create_router,
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

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置 MongoDB 客户端
    let db = DbClient::connect(&config)
        .await
        .expect("Failed to create MongoDB client");

    // 设置 Redis 客户端
    let redis = RedisClient::open(&config.redis_url, config.health_check_timeout())
        .expect("Failed to create Redis client");

    // 后端暂时不可用时照常启动，只记录日志
    let (redis_alive, db_alive) = tokio::join!(redis.is_alive(), db.is_alive());
    match redis_alive {
        Ok(true) => tracing::info!("Connected to Redis at {}", config.redis_url),
        _ => tracing::warn!("Redis at {} is not reachable yet", config.redis_url),
    }
    match db_alive {
        Ok(true) => tracing::info!("Connected to MongoDB at {}", config.mongodb_uri()),
        _ => tracing::warn!("MongoDB at {} is not reachable yet", config.mongodb_uri()),
    }

    // 设置应用状态
    let state = AppState::new(config.clone(), Arc::new(db), Arc::new(redis));

    let router = create_router(state.clone());

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
