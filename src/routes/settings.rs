//! # 계정 설정과 화면 환경설정
//!
//! ## 엔드포인트
//! - `PATCH /api/v1/settings/display-name` → 표시 이름 변경
//! - `PATCH /api/v1/settings/password`     → 비밀번호 변경
//! - `GET   /api/v1/preferences`           → 테마/언어
//! - `PUT   /api/v1/preferences`           → 테마/언어 변경
//!
//! 선생님 계정 정보는 세션 저장소의 자격 증명에, 학생 계정 정보는
//! 학생 레코드에 저장됩니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::session::DEMO_TEACHER_EMAIL,
    state::AppState,
    validation,
};

/// `PATCH /settings/display-name`
///
/// 열려 있는 세션의 이름도 함께 바꿉니다.
pub async fn update_display_name(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateDisplayNameRequest>,
) -> Result<Json<SessionUser>, AppError> {
    validation::validate_display_name(&req)?;
    let display_name = req.display_name.trim().to_string();
    let user = &auth.user;

    match user.role {
        Role::Teacher => {
            // 자격 증명이 없는 선생님(재시작 후 토큰 등)은 세션 이름만 바뀝니다.
            state
                .sessions
                .update_teacher(&user.uid, |c| c.display_name = display_name.clone())
                .await;
        }
        Role::Student => {
            db::students::update_display_name(&state.pool, &user.uid, &display_name)
                .await?
                .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;
        }
    }

    state.sessions.rename_user(&user.uid, &display_name).await;
    tracing::info!(uid = %user.uid, "Display name updated");

    Ok(Json(SessionUser {
        display_name,
        ..user.clone()
    }))
}

/// `PATCH /settings/password`
///
/// - 학생: 현재 비밀번호가 맞아야 합니다.
/// - 데모 선생님: 변경할 수 없습니다.
/// - 다른 선생님: 이번 프로세스에 등록된 자격 증명이 있어야 합니다.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    validation::validate_password_change(&req)?;
    let user = &auth.user;

    match user.role {
        Role::Teacher => {
            if normalize_email(&user.email) == DEMO_TEACHER_EMAIL {
                return Err(AppError::Forbidden(
                    "Demo teacher password cannot be changed".to_string(),
                ));
            }
            let updated = state
                .sessions
                .update_teacher(&user.uid, |c| c.password = req.new_password.clone())
                .await;
            if !updated {
                return Err(AppError::BadRequest(
                    "Could not update password. User credentials not found for this session"
                        .to_string(),
                ));
            }
        }
        Role::Student => {
            let student = db::students::get_student(&state.pool, &user.uid)
                .await?
                .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;

            if student.password.as_deref() != req.current_password.as_deref() {
                return Err(AppError::invalid("currentPassword", "Current password incorrect"));
            }
            db::students::update_password(&state.pool, &user.uid, &req.new_password).await?;
        }
    }

    tracing::info!(uid = %user.uid, "Password changed");
    Ok(Json(json!({ "message": "Password updated" })))
}

async fn current_preferences(state: &AppState) -> Result<PreferencesResponse, AppError> {
    let theme = db::preferences::get_theme(&state.pool).await?;
    let language = db::preferences::get_language(&state.pool).await?;
    Ok(PreferencesResponse {
        theme,
        language,
        dir: language.direction(),
    })
}

/// `GET /preferences`: 로그인 없이도 읽을 수 있습니다.
pub async fn get_preferences(
    State(state): State<AppState>,
) -> Result<Json<PreferencesResponse>, AppError> {
    Ok(Json(current_preferences(&state).await?))
}

/// `PUT /preferences`: 보낸 항목만 바꿉니다.
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>, AppError> {
    if let Some(theme) = req.theme {
        db::preferences::set_theme(&state.pool, theme).await?;
    }
    if let Some(language) = req.language {
        db::preferences::set_language(&state.pool, language).await?;
    }
    Ok(Json(current_preferences(&state).await?))
}
