//! # 루틴 템플릿 라우트 핸들러 (선생님 전용)
//!
//! ## 엔드포인트
//! - `GET    /api/v1/teacher/routines`      → 템플릿 목록
//! - `POST   /api/v1/teacher/routines`      → 새 템플릿
//! - `GET    /api/v1/teacher/routines/{id}` → 템플릿 하나
//! - `PUT    /api/v1/teacher/routines/{id}` → 템플릿 전체 교체
//! - `DELETE /api/v1/teacher/routines/{id}` → 템플릿 삭제 (학생/기록은 유지)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*, state::AppState, validation};

fn routine_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Routine template {} not found", id))
}

/// `GET /teacher/routines`: `{ "routines": [...] }`
pub async fn list_routines(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    auth.require_teacher()?;
    let routines = db::routines::list_routines(&state.pool).await?;
    Ok(Json(json!({ "routines": routines })))
}

pub async fn get_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RoutineTemplate>, AppError> {
    auth.require_teacher()?;
    let routine = db::routines::get_routine(&state.pool, &id)
        .await?
        .ok_or_else(|| routine_not_found(&id))?;
    Ok(Json(routine))
}

/// `POST /teacher/routines`: 검증 후 생성하고 201을 돌려줍니다.
pub async fn create_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RoutineTemplateRequest>,
) -> Result<(StatusCode, Json<RoutineTemplate>), AppError> {
    auth.require_teacher()?;
    validation::validate_routine(&req)?;

    let routine = db::routines::create_routine(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

/// `PUT /teacher/routines/{id}`: 이름과 섹션을 통째로 바꿉니다.
///
/// 이미 이 템플릿을 배정받은 학생의 저장된 주간 이상 시간은 바뀌지 않습니다.
pub async fn update_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RoutineTemplateRequest>,
) -> Result<Json<RoutineTemplate>, AppError> {
    auth.require_teacher()?;
    validation::validate_routine(&req)?;

    let routine = db::routines::update_routine(&state.pool, &id, &req)
        .await?
        .ok_or_else(|| routine_not_found(&id))?;
    Ok(Json(routine))
}

pub async fn delete_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_teacher()?;

    if db::routines::delete_routine(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(routine_not_found(&id))
    }
}
