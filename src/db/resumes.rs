//! # 선생님 이력서 맵
//!
//! `noteWiseTeacherResumes` key에 `{ 선생님 ID: 이력서 }` 형태의 객체 하나가 저장됩니다.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::db::storage::{self, TEACHER_RESUMES_KEY};
use crate::error::AppError;
use crate::models::TeacherResume;

async fn load_all(pool: &SqlitePool) -> Result<HashMap<String, TeacherResume>, AppError> {
    storage::get_item(pool, TEACHER_RESUMES_KEY, HashMap::new()).await
}

pub async fn get_resume(pool: &SqlitePool, teacher_id: &str) -> Result<Option<TeacherResume>, AppError> {
    let mut resumes = load_all(pool).await?;
    Ok(resumes.remove(teacher_id))
}

/// 이력서를 저장합니다. 같은 선생님의 이전 이력서는 덮어씁니다.
///
/// `resume.id`는 항상 `teacher_id`로 맞춰서 저장합니다.
pub async fn save_resume(
    pool: &SqlitePool,
    teacher_id: &str,
    mut resume: TeacherResume,
) -> Result<TeacherResume, AppError> {
    let mut resumes = load_all(pool).await?;

    resume.id = teacher_id.to_string();
    resumes.insert(teacher_id.to_string(), resume.clone());
    storage::set_item(pool, TEACHER_RESUMES_KEY, &resumes).await?;

    tracing::info!(teacher_id, "Saved teacher resume");
    Ok(resume)
}
