//! # 학생 관리 라우트 핸들러 (선생님 전용)
//!
//! ## 엔드포인트
//! - `GET    /api/v1/teacher/dashboard`                 → 담당 학생 요약
//! - `GET    /api/v1/teacher/students`                  → 담당 학생 목록
//! - `POST   /api/v1/teacher/students`                  → 학생 추가
//! - `GET    /api/v1/teacher/students/{id}`             → 학생 상세 (기간 기록 + 차트)
//! - `DELETE /api/v1/teacher/students/{id}`             → 학생 삭제 (기록은 유지)
//! - `POST   /api/v1/teacher/students/{id}/assignment`  → 루틴 배정

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::practice::{load_overview, PracticeOverview},
    services::progress,
    state::AppState,
    validation,
};

fn student_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Student {} not found", id))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub teacher_name: String,
    pub total_students: usize,
    pub active_students: usize,
    pub students: Vec<StudentResponse>,
}

/// `GET /teacher/dashboard`: 담당 학생과 각자의 현재 루틴/진도
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let teacher = auth.require_teacher()?;
    let students = db::students::list_students_by_teacher(&state.pool, &teacher.uid).await?;

    let active_students = students
        .iter()
        .filter(|s| s.status == StudentStatus::Active)
        .count();

    Ok(Json(DashboardResponse {
        teacher_name: teacher.display_name.clone(),
        total_students: students.len(),
        active_students,
        students: students.into_iter().map(StudentResponse::from).collect(),
    }))
}

/// `GET /teacher/students`: `{ "students": [...] }`
pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let teacher = auth.require_teacher()?;
    let students: Vec<StudentResponse> =
        db::students::list_students_by_teacher(&state.pool, &teacher.uid)
            .await?
            .into_iter()
            .map(StudentResponse::from)
            .collect();

    Ok(Json(json!({ "students": students })))
}

/// `POST /teacher/students`
///
/// 이메일은 공백 제거 + 소문자로 저장하고, 이미 있으면 409.
pub async fn add_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let teacher = auth.require_teacher()?;
    validation::validate_add_student(&req)?;

    let student = db::students::add_student(&state.pool, &req, teacher).await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetailResponse {
    pub student: StudentResponse,
    /// 기간 기록은 날짜 오름차순
    pub practice: PracticeOverview,
}

/// `GET /teacher/students/{id}`
pub async fn get_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StudentDetailResponse>, AppError> {
    auth.require_teacher()?;
    let student = db::students::get_student(&state.pool, &id)
        .await?
        .ok_or_else(|| student_not_found(&id))?;

    let practice = load_overview(&state.pool, &student).await?;
    Ok(Json(StudentDetailResponse {
        student: student.into(),
        practice,
    }))
}

pub async fn delete_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth.require_teacher()?;

    if db::students::delete_student(&state.pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(student_not_found(&id))
    }
}

/// `POST /teacher/students/{id}/assignment`
///
/// 시작일을 생략하면 서버 로컬 기준 오늘부터 8일간입니다.
/// 템플릿이나 학생이 없으면 아무것도 바꾸지 않고 404.
pub async fn assign_routine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<AssignRoutineRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    auth.require_teacher()?;

    let template_id = req
        .template_id
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::invalid("templateId", "Select a routine template"))?;

    let start_date = match req.start_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::invalid("startDate", "Date must be in YYYY-MM-DD format"))?,
        None => progress::today(),
    };

    let template = db::routines::get_routine(&state.pool, template_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Routine template {} not found", template_id)))?;

    let student = db::students::assign_routine(&state.pool, &id, &template, start_date)
        .await?
        .ok_or_else(|| student_not_found(&id))?;

    Ok(Json(student.into()))
}
