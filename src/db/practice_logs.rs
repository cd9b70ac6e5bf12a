//! # 일일 연습 기록 컬렉션
//!
//! `noteWisePracticeLogs` key에 모든 학생의 기록이 한 배열로 저장됩니다.
//! 기록은 지워지지 않습니다. 같은 (학생, 날짜, 루틴)으로 다시 제출하면 교체만 됩니다.

use sqlx::SqlitePool;

use crate::db::storage::{self, PRACTICE_LOGS_KEY};
use crate::error::AppError;
use crate::models::*;

pub async fn list_practice_logs(pool: &SqlitePool) -> Result<Vec<DailyPracticeLog>, AppError> {
    storage::get_item(pool, PRACTICE_LOGS_KEY, Vec::new()).await
}

/// 한 학생의 모든 기록 (루틴 구분 없음)
pub async fn list_logs_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<DailyPracticeLog>, AppError> {
    let logs = list_practice_logs(pool).await?;
    Ok(logs.into_iter().filter(|l| l.student_id == student_id).collect())
}

/// 특정 (학생, 날짜, 루틴) 자리의 기록을 찾습니다.
pub async fn find_log(
    pool: &SqlitePool,
    student_id: &str,
    date: &str,
    routine_template_id: Option<&str>,
) -> Result<Option<DailyPracticeLog>, AppError> {
    let logs = list_practice_logs(pool).await?;
    Ok(logs
        .into_iter()
        .find(|l| l.same_slot(student_id, date, routine_template_id)))
}

/// 기록을 저장합니다. 같은 자리에 이전 기록이 있으면 지우고 새 기록으로 바꿉니다.
///
/// 반환값의 bool은 이전 기록을 교체했는지 여부입니다.
pub async fn upsert_log(
    pool: &SqlitePool,
    log: DailyPracticeLog,
) -> Result<(DailyPracticeLog, bool), AppError> {
    let mut logs = list_practice_logs(pool).await?;

    let before = logs.len();
    logs.retain(|l| !l.same_slot(&log.student_id, &log.date, log.routine_template_id.as_deref()));
    let replaced = logs.len() != before;

    logs.push(log.clone());
    storage::set_item(pool, PRACTICE_LOGS_KEY, &logs).await?;

    tracing::info!(
        student_id = %log.student_id,
        date = %log.date,
        minutes = log.total_minutes(),
        replaced,
        "Saved practice log"
    );
    Ok((log, replaced))
}
