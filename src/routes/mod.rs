//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 모의 인증 (회원가입, 로그인, 로그아웃, 내 정보)
//! - `routines`: 루틴 템플릿 CRUD (선생님)
//! - `students`: 대시보드, 학생 관리, 루틴 배정 (선생님)
//! - `resume`: 선생님 이력서
//! - `practice`: 일일 연습 기록, 차트, 날짜 이동, 선생님 프로필 (학생)
//! - `settings`: 표시 이름/비밀번호 변경, 테마/언어 환경설정
//! - `health`: 서버 상태 확인

pub mod auth;
pub mod health;
pub mod practice;
pub mod resume;
pub mod routines;
pub mod settings;
pub mod students;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

/// `/api/v1` 아래에 붙는 모든 API 라우트
///
/// 경로 파라미터는 Axum 0.8 문법(`{id}`)을 씁니다.
pub fn api_routes(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let teacher_routes = Router::new()
        .route("/teacher/dashboard", get(students::dashboard))
        .route(
            "/teacher/routines",
            get(routines::list_routines).post(routines::create_routine),
        )
        .route(
            "/teacher/routines/{id}",
            get(routines::get_routine)
                .put(routines::update_routine)
                .delete(routines::delete_routine),
        )
        .route(
            "/teacher/students",
            get(students::list_students).post(students::add_student),
        )
        .route(
            "/teacher/students/{id}",
            get(students::get_student).delete(students::delete_student),
        )
        .route("/teacher/students/{id}/assignment", post(students::assign_routine))
        .route(
            "/teacher/resume",
            get(resume::get_my_resume).put(resume::save_my_resume),
        );

    let student_routes = Router::new()
        .route(
            "/student/practice",
            get(practice::practice_day).post(practice::submit_practice_log),
        )
        .route("/student/practice/logs", get(practice::list_my_logs))
        .route("/student/practice/chart", get(practice::practice_chart))
        .route("/student/practice/navigate", get(practice::navigate))
        .route("/student/teacher-profile", get(practice::teacher_profile));

    let settings_routes = Router::new()
        .route("/settings/display-name", patch(settings::update_display_name))
        .route("/settings/password", patch(settings::change_password))
        .route(
            "/preferences",
            get(settings::get_preferences).put(settings::update_preferences),
        );

    Router::new()
        .merge(auth_routes)
        .merge(teacher_routes)
        .merge(student_routes)
        .merge(settings_routes)
        .route("/health", get(health::health_check))
        .with_state(state)
}
