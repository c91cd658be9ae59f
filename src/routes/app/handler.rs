use axum::{Json, extract::State};

use crate::{AppState, error::AppResult};

use super::model::{StatsResponse, StatusResponse};

#[axum::debug_handler]
pub async fn get_status(State(state): State<AppState>) -> AppResult<Json<StatusResponse>> {
    // 两个检查互不依赖，并发执行
    let (redis, db) = tokio::try_join!(state.redis.is_alive(), state.db.is_alive())?;

    Ok(Json(StatusResponse { redis, db }))
}

#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let (users, files) = tokio::try_join!(state.db.nb_users(), state.db.nb_files())?;

    Ok(Json(StatsResponse { users, files }))
}
