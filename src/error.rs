use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 返回给客户端的固定错误信息，不暴露内部细节
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum AppError {
    /// 文档数据库不可达或查询失败
    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),
    /// 缓存不可达
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::CacheUnavailable(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    // 细节由客户端代码和 log_errors 中间件记录
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: INTERNAL_SERVER_ERROR,
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
