use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{AppState, middleware::log_errors, routes};

// 状态检查相关的路由
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(routes::app::get_status))
        .route("/stats", get(routes::app::get_stats))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(app_routes())
        .layer(axum::middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
