//! # 학생 컬렉션
//!
//! `noteWiseStudents` key에 학생 배열 전체가 저장됩니다.
//! 조회, 이메일 중복 검사, 존재 여부 확인은 모두 배열을 처음부터 훑어서 처리합니다.
//!
//! 이메일은 대소문자를 구분하지 않고 컬렉션 전체에서 유일해야 합니다.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::db::storage::{self, STUDENTS_KEY};
use crate::error::AppError;
use crate::models::*;
use crate::services::progress::ProgressOutcome;

/// 새로 추가하는 학생의 기본 비밀번호
pub const DEFAULT_STUDENT_PASSWORD: &str = "password";

pub async fn list_students(pool: &SqlitePool) -> Result<Vec<StudentData>, AppError> {
    storage::get_item(pool, STUDENTS_KEY, Vec::new()).await
}

/// 특정 선생님에게 연결된 학생만 반환합니다.
pub async fn list_students_by_teacher(
    pool: &SqlitePool,
    teacher_id: &str,
) -> Result<Vec<StudentData>, AppError> {
    let students = list_students(pool).await?;
    Ok(students
        .into_iter()
        .filter(|s| s.teacher_id.as_deref() == Some(teacher_id))
        .collect())
}

pub async fn get_student(pool: &SqlitePool, id: &str) -> Result<Option<StudentData>, AppError> {
    let students = list_students(pool).await?;
    Ok(students.into_iter().find(|s| s.id == id))
}

/// 정규화한 이메일로 학생을 찾습니다 (로그인용).
pub async fn find_student_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<StudentData>, AppError> {
    let email = normalize_email(email);
    let students = list_students(pool).await?;
    Ok(students.into_iter().find(|s| s.normalized_email() == email))
}

/// 학생을 추가합니다. 같은 이메일의 학생이 이미 있으면 `Conflict`.
///
/// 추가한 선생님이 학생의 담당 선생님이 됩니다.
pub async fn add_student(
    pool: &SqlitePool,
    req: &AddStudentRequest,
    teacher: &SessionUser,
) -> Result<StudentData, AppError> {
    let mut students = list_students(pool).await?;

    let email = normalize_email(&req.email);
    if students.iter().any(|s| s.normalized_email() == email) {
        return Err(AppError::Conflict(
            "A student with this email already exists".to_string(),
        ));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let display_name = req.full_name.trim().to_string();
    let password = req
        .initial_password
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_STUDENT_PASSWORD)
        .to_string();

    let student = StudentData {
        uid: Some(id.clone()),
        id,
        avatar: avatar_url(&display_name),
        display_name,
        email,
        password: Some(password),
        routines_assigned: 0,
        status: StudentStatus::Active,
        role: "student".to_string(),
        teacher_id: Some(teacher.uid.clone()),
        teacher_name: Some(teacher.display_name.clone()),
        current_routine: None,
        current_routine_id: None,
        current_routine_assignment_date: None,
        current_routine_ideal_weekly_time: None,
        current_routine_progress_percent: None,
        joined_date: Some(Utc::now().to_rfc3339()),
    };

    students.push(student.clone());
    storage::set_item(pool, STUDENTS_KEY, &students).await?;

    tracing::info!(student_id = %student.id, teacher_id = %teacher.uid, "Added student");
    Ok(student)
}

/// 학생을 삭제합니다. 연습 기록은 남겨둡니다.
pub async fn delete_student(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut students = list_students(pool).await?;
    let before = students.len();
    students.retain(|s| s.id != id);

    if students.len() == before {
        return Ok(false);
    }

    storage::set_item(pool, STUDENTS_KEY, &students).await?;
    tracing::info!(student_id = %id, "Deleted student");
    Ok(true)
}

/// 학생 한 명을 찾아 `apply`로 수정한 뒤 컬렉션 전체를 다시 저장합니다.
///
/// 학생이 없으면 아무것도 쓰지 않고 `Ok(None)`.
async fn modify_student<F>(
    pool: &SqlitePool,
    id: &str,
    apply: F,
) -> Result<Option<StudentData>, AppError>
where
    F: FnOnce(&mut StudentData),
{
    let mut students = list_students(pool).await?;

    let Some(student) = students.iter_mut().find(|s| s.id == id) else {
        return Ok(None);
    };
    apply(student);
    let updated = student.clone();

    storage::set_item(pool, STUDENTS_KEY, &students).await?;
    Ok(Some(updated))
}

/// 루틴을 배정합니다.
///
/// 현재 루틴 정보와 배정일(과제 기간 시작일)을 덮어쓰고,
/// 배정 횟수를 1 늘리고, 진도율을 0으로 되돌립니다.
/// 이전 루틴의 연습 기록은 지우지 않습니다.
pub async fn assign_routine(
    pool: &SqlitePool,
    student_id: &str,
    template: &RoutineTemplate,
    start_date: NaiveDate,
) -> Result<Option<StudentData>, AppError> {
    let ideal = template
        .calculated_ideal_weekly_time
        .unwrap_or_else(|| template.ideal_weekly_minutes());

    let updated = modify_student(pool, student_id, |s| {
        s.current_routine = Some(template.template_name.clone());
        s.current_routine_id = Some(template.id.clone());
        s.current_routine_assignment_date = Some(start_date.format("%Y-%m-%d").to_string());
        s.routines_assigned += 1;
        s.current_routine_progress_percent = Some(0);
        s.current_routine_ideal_weekly_time = Some(ideal);
    })
    .await?;

    if updated.is_some() {
        tracing::info!(
            student_id,
            routine_id = %template.id,
            start = %start_date,
            "Assigned routine"
        );
    }
    Ok(updated)
}

/// 진도 계산 결과를 학생 레코드에 저장합니다.
pub async fn record_progress(
    pool: &SqlitePool,
    student_id: &str,
    outcome: &ProgressOutcome,
) -> Result<Option<StudentData>, AppError> {
    let updated = modify_student(pool, student_id, |s| {
        s.current_routine_ideal_weekly_time = Some(outcome.ideal_weekly_time);
        s.current_routine_progress_percent = Some(outcome.percent);
    })
    .await?;

    tracing::debug!(student_id, percent = outcome.percent, "Recorded progress");
    Ok(updated)
}

pub async fn update_display_name(
    pool: &SqlitePool,
    student_id: &str,
    display_name: &str,
) -> Result<Option<StudentData>, AppError> {
    modify_student(pool, student_id, |s| {
        s.display_name = display_name.to_string();
        s.avatar = avatar_url(display_name);
    })
    .await
}

pub async fn update_password(
    pool: &SqlitePool,
    student_id: &str,
    password: &str,
) -> Result<Option<StudentData>, AppError> {
    modify_student(pool, student_id, |s| s.password = Some(password.to_string())).await
}
