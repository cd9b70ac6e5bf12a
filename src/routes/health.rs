//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "storage": "ok" }`
//!
//! 저장소에 간단한 쿼리를 보내 key-value 테이블이 응답하는지도 함께 확인합니다.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// `GET /health`: 서버와 저장소 상태를 확인합니다.
///
/// 저장소가 응답하지 않으면 503과 함께 `"storage": "unavailable"`을 돌려줍니다.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT COUNT(*) FROM kv_store")
        .execute(&state.pool)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "storage": "ok" })),
        ),
        Err(e) => {
            tracing::error!("Storage health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "storage": "unavailable" })),
            )
        }
    }
}
