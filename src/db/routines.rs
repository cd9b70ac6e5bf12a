//! # 루틴 템플릿 컬렉션
//!
//! `noteWiseRoutines` key 하나에 템플릿 배열 전체가 저장됩니다.
//! 모든 변경은 "전체 읽기 → 수정 → 전체 쓰기"로 이뤄집니다.
//!
//! 템플릿을 지워도 학생 레코드나 연습 기록은 건드리지 않습니다 (cascade 없음).

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::storage::{self, ROUTINES_KEY};
use crate::error::AppError;
use crate::models::*;
use crate::validation::MAX_IDEAL_DAILY_MINUTES;

/// 저장된 모든 템플릿을 저장 순서대로 반환합니다.
pub async fn list_routines(pool: &SqlitePool) -> Result<Vec<RoutineTemplate>, AppError> {
    storage::get_item(pool, ROUTINES_KEY, Vec::new()).await
}

pub async fn get_routine(pool: &SqlitePool, id: &str) -> Result<Option<RoutineTemplate>, AppError> {
    let routines = list_routines(pool).await?;
    Ok(routines.into_iter().find(|r| r.id == id))
}

/// 요청의 섹션 입력을 저장용 섹션으로 바꿉니다.
///
/// id가 없는 섹션에는 새 UUIDv7을 발급합니다.
/// 이상 시간은 검증을 통과한 0~1440분 범위입니다.
fn build_sections(inputs: &[PracticeSectionInput]) -> Vec<PracticeSection> {
    inputs
        .iter()
        .map(|input| PracticeSection {
            id: input
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
            name: input.name.trim().to_string(),
            description: input
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            ideal_daily_time_minutes: input
                .ideal_daily_time_minutes
                .map(|m| m.clamp(0, MAX_IDEAL_DAILY_MINUTES) as u32),
        })
        .collect()
}

/// 템플릿 값을 채우고 주간 이상 시간을 다시 계산합니다.
fn build_template(id: String, req: &RoutineTemplateRequest) -> RoutineTemplate {
    let mut template = RoutineTemplate {
        id,
        template_name: req.template_name.trim().to_string(),
        sections: build_sections(&req.sections),
        last_modified: Utc::now().to_rfc3339(),
        calculated_ideal_weekly_time: None,
    };
    template.calculated_ideal_weekly_time = Some(template.ideal_weekly_minutes());
    template
}

/// 새 템플릿을 만들어 컬렉션 끝에 추가합니다.
pub async fn create_routine(
    pool: &SqlitePool,
    req: &RoutineTemplateRequest,
) -> Result<RoutineTemplate, AppError> {
    let mut routines = list_routines(pool).await?;

    let template = build_template(uuid::Uuid::now_v7().to_string(), req);
    routines.push(template.clone());
    storage::set_item(pool, ROUTINES_KEY, &routines).await?;

    tracing::info!(routine_id = %template.id, "Created routine template");
    Ok(template)
}

/// 템플릿 전체를 요청 내용으로 교체합니다.
///
/// ## 반환값
/// - `Ok(Some(RoutineTemplate))`: 교체 성공
/// - `Ok(None)`: 해당 ID의 템플릿이 없음
pub async fn update_routine(
    pool: &SqlitePool,
    id: &str,
    req: &RoutineTemplateRequest,
) -> Result<Option<RoutineTemplate>, AppError> {
    let mut routines = list_routines(pool).await?;

    let Some(slot) = routines.iter_mut().find(|r| r.id == id) else {
        return Ok(None);
    };
    *slot = build_template(id.to_string(), req);
    let updated = slot.clone();

    storage::set_item(pool, ROUTINES_KEY, &routines).await?;

    tracing::info!(routine_id = %id, "Updated routine template");
    Ok(Some(updated))
}

/// 템플릿을 삭제합니다. 삭제된 것이 있으면 true.
///
/// 이 템플릿을 배정받은 학생과 그 연습 기록은 그대로 남습니다.
pub async fn delete_routine(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut routines = list_routines(pool).await?;
    let before = routines.len();
    routines.retain(|r| r.id != id);

    if routines.len() == before {
        return Ok(false);
    }

    storage::set_item(pool, ROUTINES_KEY, &routines).await?;
    tracing::info!(routine_id = %id, "Deleted routine template");
    Ok(true)
}
