//! # 선생님 이력서 라우트 핸들러
//!
//! - `GET /api/v1/teacher/resume` → 내 이력서 (없으면 빈 이력서)
//! - `PUT /api/v1/teacher/resume` → 내 이력서 저장

use axum::{extract::State, Json};

use crate::{db, error::AppError, middleware::auth::AuthUser, models::*, state::AppState, validation};

/// 빈 문자열은 저장하지 않습니다.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn get_my_resume(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TeacherResume>, AppError> {
    let teacher = auth.require_teacher()?;

    let resume = db::resumes::get_resume(&state.pool, &teacher.uid)
        .await?
        .unwrap_or_else(|| TeacherResume {
            id: teacher.uid.clone(),
            ..Default::default()
        });
    Ok(Json(resume))
}

pub async fn save_my_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SaveResumeRequest>,
) -> Result<Json<TeacherResume>, AppError> {
    let teacher = auth.require_teacher()?;
    validation::validate_resume(&req)?;

    // 검증을 통과했으므로 연차는 0 이상
    let years = |v: Option<i64>| v.and_then(|y| u32::try_from(y).ok());

    let resume = TeacherResume {
        id: teacher.uid.clone(),
        short_bio: non_empty(req.short_bio),
        instruments_taught: non_empty(Some(req.instruments_taught)),
        music_genres: non_empty(Some(req.music_genres)),
        years_teaching: years(req.years_teaching),
        formal_education: non_empty(req.formal_education),
        teaching_philosophy: non_empty(req.teaching_philosophy),
        years_performing: years(req.years_performing),
        band_orchestra_memberships: non_empty(req.band_orchestra_memberships),
        certifications: non_empty(req.certifications),
        honors_memberships: non_empty(req.honors_memberships),
    };

    let saved = db::resumes::save_resume(&state.pool, &teacher.uid, resume).await?;
    Ok(Json(saved))
}
