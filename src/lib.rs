use std::sync::Arc;

use cache::KeyValueCache;
use config::Config;
use database::DocumentStore;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

/// 所有请求共享的状态，客户端在启动时创建一次
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn DocumentStore>,
    pub redis: Arc<dyn KeyValueCache>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DocumentStore>, redis: Arc<dyn KeyValueCache>) -> Self {
        Self { config, db, redis }
    }
}
