//! # 데모 데이터
//!
//! 서버 시작 시 컬렉션이 비어 있으면 데모 선생님용 루틴 템플릿 2개와
//! 학생 4명을 채워 넣습니다. 이미 데이터가 있는 컬렉션은 건드리지 않습니다.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::db::{self, storage};
use crate::error::AppError;
use crate::models::*;
use crate::services::session::{DEMO_TEACHER_NAME, DEMO_TEACHER_UID};

fn section(id: &str, name: &str, description: &str) -> PracticeSection {
    PracticeSection {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        ideal_daily_time_minutes: None,
    }
}

fn routine(id: &str, name: &str, sections: Vec<PracticeSection>, modified: NaiveDate) -> RoutineTemplate {
    let mut template = RoutineTemplate {
        id: id.to_string(),
        template_name: name.to_string(),
        sections,
        last_modified: modified.and_time(chrono::NaiveTime::MIN).and_utc().to_rfc3339(),
        calculated_ideal_weekly_time: None,
    };
    template.calculated_ideal_weekly_time = Some(template.ideal_weekly_minutes());
    template
}

pub fn demo_routines() -> Vec<RoutineTemplate> {
    let date = |d| NaiveDate::from_ymd_opt(2024, 7, d).unwrap_or_default();
    vec![
        routine(
            "rt1",
            "Beginner Piano Scales - Week 1",
            vec![
                section("s1", "C Major", "2 octaves"),
                section("s2", "G Major", "2 octaves"),
            ],
            date(20),
        ),
        routine(
            "rt2",
            "Intermediate Guitar Chords",
            vec![section("s3", "Common Chords", "Practice transitions")],
            date(18),
        ),
    ]
}

pub fn demo_students() -> Vec<StudentData> {
    let joined = Utc::now().to_rfc3339();
    [
        ("1", "Alice Wonderland", "alice@example.com", 2, StudentStatus::Active),
        ("2", "Bob The Builder", "bob@example.com", 1, StudentStatus::Active),
        ("3", "Charlie Brown", "charlie@example.com", 0, StudentStatus::Inactive),
        ("4", "Diana Prince", "diana@example.com", 3, StudentStatus::Active),
    ]
    .into_iter()
    .map(|(id, name, email, assigned, status)| StudentData {
        id: id.to_string(),
        uid: Some(id.to_string()),
        display_name: name.to_string(),
        email: email.to_string(),
        password: Some(db::students::DEFAULT_STUDENT_PASSWORD.to_string()),
        avatar: avatar_url(name),
        routines_assigned: assigned,
        status,
        role: "student".to_string(),
        teacher_id: Some(DEMO_TEACHER_UID.to_string()),
        teacher_name: Some(DEMO_TEACHER_NAME.to_string()),
        current_routine: None,
        current_routine_id: None,
        current_routine_assignment_date: None,
        current_routine_ideal_weekly_time: None,
        current_routine_progress_percent: None,
        joined_date: Some(joined.clone()),
    })
    .collect()
}

/// 비어 있는 컬렉션에만 데모 데이터를 씁니다.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<(), AppError> {
    if db::routines::list_routines(pool).await?.is_empty() {
        storage::set_item(pool, storage::ROUTINES_KEY, &demo_routines()).await?;
        tracing::info!("Seeded demo routine templates");
    }

    if db::students::list_students(pool).await?.is_empty() {
        storage::set_item(pool, storage::STUDENTS_KEY, &demo_students()).await?;
        tracing::info!("Seeded demo students");
    }

    Ok(())
}
