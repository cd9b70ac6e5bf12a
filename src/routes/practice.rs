//! # 학생 연습 기록 라우트 핸들러 (학생 전용)
//!
//! ## 엔드포인트
//! - `GET  /api/v1/student/practice?date=YYYY-MM-DD`  → 하루 화면 (입력 폼 + 기간 정보)
//! - `POST /api/v1/student/practice`                  → 하루 기록 제출 + 진도 재계산
//! - `GET  /api/v1/student/practice/logs`             → 현재 기간 기록 (최신순)
//! - `GET  /api/v1/student/practice/chart`            → 8일 차트 데이터
//! - `GET  /api/v1/student/practice/navigate?from=…&direction=prev|next`
//! - `GET  /api/v1/student/teacher-profile`           → 담당 선생님 이력서

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::progress::{self, AssignmentWindow, ChartPoint, Direction, ProgressOutcome},
    state::AppState,
    validation,
};

// ── 공용: 학생 한 명의 현재 과제 현황 ──

/// 현재 루틴/기간 기준으로 모은 학생의 연습 현황
///
/// 선생님의 학생 상세 화면과 학생의 기록/차트 화면이 함께 씁니다.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeOverview {
    pub window: Option<AssignmentWindow>,
    /// 배정된 템플릿: 삭제되었으면 None
    pub routine: Option<RoutineTemplate>,
    pub ideal_daily_practice: u32,
    /// 기간 안의 기록, 날짜 오름차순
    pub logs: Vec<DailyPracticeLog>,
    pub chart: Vec<ChartPoint>,
    pub progress_percent: u32,
}

pub(crate) async fn load_overview(
    pool: &SqlitePool,
    student: &StudentData,
) -> Result<PracticeOverview, AppError> {
    let window = AssignmentWindow::for_student(student);

    let routine = match student.current_routine_id.as_deref() {
        Some(id) => db::routines::get_routine(pool, id).await?,
        None => None,
    };
    let ideal_daily_practice = routine
        .as_ref()
        .map(|r| r.total_ideal_daily_minutes())
        .unwrap_or(0);

    let (logs, chart) = match (window.as_ref(), student.current_routine_id.as_deref()) {
        (Some(window), Some(routine_id)) => {
            let all_logs = db::practice_logs::list_logs_for_student(pool, &student.id).await?;
            let relevant = progress::relevant_logs(&all_logs, &student.id, routine_id, window);
            let chart = progress::chart_series(window, &relevant, ideal_daily_practice);

            let mut logs: Vec<DailyPracticeLog> = relevant.into_iter().cloned().collect();
            logs.sort_by(|a, b| a.date.cmp(&b.date));
            (logs, chart)
        }
        _ => (Vec::new(), Vec::new()),
    };

    Ok(PracticeOverview {
        window,
        routine,
        ideal_daily_practice,
        logs,
        chart,
        progress_percent: student.current_routine_progress_percent.unwrap_or(0),
    })
}

/// 로그인한 학생의 최신 레코드를 읽습니다.
async fn current_student(state: &AppState, auth: &AuthUser) -> Result<StudentData, AppError> {
    let user = auth.require_student()?;
    db::students::get_student(&state.pool, &user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))
}

/// `YYYY-MM-DD` 형식만 받습니다.
fn parse_day(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid(field, "Date must be in YYYY-MM-DD format"))
}

fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── 하루 화면 ──

#[derive(Debug, Deserialize)]
pub struct PracticeDayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeDayResponse {
    pub date: String,
    pub loggable: bool,
    pub window: Option<AssignmentWindow>,
    pub can_navigate_prev: bool,
    pub can_navigate_next: bool,
    pub routine_id: Option<String>,
    pub routine_name: Option<String>,
    /// 이미 저장된 기록이 있으면 그 값, 없으면 템플릿 섹션마다 0분
    pub entries: Vec<DailyPracticeLogEntry>,
    pub daily_notes: Option<String>,
    pub has_existing_log: bool,
    pub progress_percent: u32,
}

/// `GET /student/practice?date=`: 날짜를 생략하면 오늘
pub async fn practice_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PracticeDayQuery>,
) -> Result<Json<PracticeDayResponse>, AppError> {
    let student = current_student(&state, &auth).await?;
    let date = match query.date.as_deref() {
        Some(raw) => parse_day("date", raw)?,
        None => progress::today(),
    };
    let key = format_day(date);

    let window = AssignmentWindow::for_student(&student);
    let (can_navigate_prev, can_navigate_next) = progress::navigation_flags(window.as_ref(), date);

    let routine_id = student.current_routine_id.clone();
    let existing = match routine_id.as_deref() {
        Some(id) => db::practice_logs::find_log(&state.pool, &student.id, &key, Some(id)).await?,
        None => None,
    };

    let (entries, daily_notes) = match &existing {
        Some(log) => (log.log_data.clone(), log.daily_notes.clone()),
        None => {
            let template = match routine_id.as_deref() {
                Some(id) => db::routines::get_routine(&state.pool, id).await?,
                None => None,
            };
            let entries = template
                .map(|t| {
                    t.sections
                        .into_iter()
                        .map(|s| DailyPracticeLogEntry {
                            section_id: s.id,
                            section_name: s.name,
                            time_spent_minutes: 0,
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            (entries, None)
        }
    };

    Ok(Json(PracticeDayResponse {
        date: key,
        loggable: routine_id.is_some() && progress::is_loggable(window.as_ref(), date),
        window,
        can_navigate_prev,
        can_navigate_next,
        routine_id,
        routine_name: student.current_routine.clone(),
        entries,
        daily_notes,
        has_existing_log: existing.is_some(),
        progress_percent: student.current_routine_progress_percent.unwrap_or(0),
    }))
}

// ── 기록 제출 ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPracticeLogResponse {
    pub log: DailyPracticeLog,
    /// 같은 날의 이전 기록을 교체했는지 여부
    pub replaced: bool,
    pub progress: Option<ProgressOutcome>,
}

/// `POST /student/practice`
///
/// ## 처리 흐름
/// 1. 본문 검증 (섹션마다 0~300분), 날짜 형식 확인
/// 2. 현재 루틴과 과제 기간 확인: 기간 밖이면 유효 기간을 알려주며 거부
/// 3. 같은 (학생, 날짜, 루틴) 기록을 교체하여 저장
/// 4. 진도 재계산 후 학생 레코드에 저장
pub async fn submit_practice_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubmitPracticeLogRequest>,
) -> Result<Json<SubmitPracticeLogResponse>, AppError> {
    let student = current_student(&state, &auth).await?;
    validation::validate_practice_log(&req)?;
    let date = parse_day("date", &req.date)?;

    let Some(routine_id) = student.current_routine_id.clone() else {
        return Err(AppError::BadRequest("No routine is currently assigned".to_string()));
    };
    let Some(window) = AssignmentWindow::for_student(&student) else {
        return Err(AppError::BadRequest("No routine is currently assigned".to_string()));
    };
    if !window.contains(date) {
        return Err(AppError::BadRequest(window.describe()));
    }

    let log = DailyPracticeLog {
        id: uuid::Uuid::now_v7().to_string(),
        student_id: student.id.clone(),
        routine_name: student.current_routine.clone(),
        routine_template_id: Some(routine_id.clone()),
        date: format_day(date),
        log_data: req
            .log_data
            .iter()
            .map(|entry| DailyPracticeLogEntry {
                section_id: entry.section_id.clone(),
                section_name: entry.section_name.clone(),
                // 검증을 통과했으므로 0..=300 범위
                time_spent_minutes: entry
                    .time_spent_minutes
                    .clamp(0, validation::MAX_MINUTES_PER_ENTRY) as u32,
            })
            .collect(),
        daily_notes: req
            .daily_notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    };
    let (log, replaced) = db::practice_logs::upsert_log(&state.pool, log).await?;

    let template = db::routines::get_routine(&state.pool, &routine_id).await?;
    let all_logs = db::practice_logs::list_logs_for_student(&state.pool, &student.id).await?;
    let outcome = progress::compute_progress(&student, template.as_ref(), &all_logs);
    if let Some(outcome) = &outcome {
        db::students::record_progress(&state.pool, &student.id, outcome).await?;
    }

    Ok(Json(SubmitPracticeLogResponse {
        log,
        replaced,
        progress: outcome,
    }))
}

// ── 기록 목록 / 차트 ──

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLogsResponse {
    pub window: Option<AssignmentWindow>,
    /// 최신 날짜가 먼저
    pub logs: Vec<DailyPracticeLog>,
}

/// `GET /student/practice/logs`
pub async fn list_my_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PracticeLogsResponse>, AppError> {
    let student = current_student(&state, &auth).await?;
    let overview = load_overview(&state.pool, &student).await?;

    let mut logs = overview.logs;
    logs.reverse();

    Ok(Json(PracticeLogsResponse {
        window: overview.window,
        logs,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeChartResponse {
    pub window: Option<AssignmentWindow>,
    pub ideal_daily_practice: u32,
    pub chart: Vec<ChartPoint>,
    pub progress_percent: u32,
}

/// `GET /student/practice/chart`: 과제가 없으면 빈 차트
pub async fn practice_chart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PracticeChartResponse>, AppError> {
    let student = current_student(&state, &auth).await?;
    let overview = load_overview(&state.pool, &student).await?;

    Ok(Json(PracticeChartResponse {
        window: overview.window,
        ideal_daily_practice: overview.ideal_daily_practice,
        chart: overview.chart,
        progress_percent: overview.progress_percent,
    }))
}

// ── 날짜 이동 ──

#[derive(Debug, Deserialize)]
pub struct NavigateQuery {
    pub from: String,
    pub direction: Direction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub date: String,
    /// 이동했는지 여부: 기간 밖이면 false이고 date는 원래 날짜
    pub moved: bool,
    pub can_navigate_prev: bool,
    pub can_navigate_next: bool,
}

/// `GET /student/practice/navigate?from=2024-01-03&direction=next`
pub async fn navigate(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<NavigateQuery>,
) -> Result<Json<NavigateResponse>, AppError> {
    let student = current_student(&state, &auth).await?;
    let from = parse_day("from", &query.from)?;

    let window = AssignmentWindow::for_student(&student);
    let target = progress::navigate(window.as_ref(), from, query.direction);
    let (can_navigate_prev, can_navigate_next) = progress::navigation_flags(window.as_ref(), target);

    Ok(Json(NavigateResponse {
        date: format_day(target),
        moved: target != from,
        can_navigate_prev,
        can_navigate_next,
    }))
}

// ── 선생님 프로필 ──

/// `GET /student/teacher-profile`: 이력서가 없으면 404
pub async fn teacher_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TeacherProfileResponse>, AppError> {
    let student = current_student(&state, &auth).await?;

    let not_found = || AppError::NotFound("Teacher profile not found".to_string());
    let teacher_id = student.teacher_id.as_deref().ok_or_else(not_found)?;
    let resume = db::resumes::get_resume(&state.pool, teacher_id)
        .await?
        .ok_or_else(not_found)?;

    let teacher_name = match student.teacher_name.clone() {
        Some(name) => Some(name),
        None => state
            .sessions
            .teacher_by_uid(teacher_id)
            .await
            .map(|c| c.display_name),
    };

    Ok(Json(TeacherProfileResponse {
        teacher_name,
        instruments: split_list(resume.instruments_taught.as_deref()),
        genres: split_list(resume.music_genres.as_deref()),
        resume,
    }))
}
