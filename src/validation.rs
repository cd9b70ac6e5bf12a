//! # 요청 본문 검증
//!
//! 각 폼(요청 본문)에 대한 검증 함수입니다.
//! 실패한 필드를 모두 모아 `AppError::Validation`으로 돌려주므로
//! 프론트엔드는 한 번에 모든 입력칸의 에러를 표시할 수 있습니다.
//!
//! 검증을 통과하기 전에는 어떤 저장도 일어나지 않습니다.

use crate::error::{AppError, FieldError};
use crate::models::*;

/// 이메일 최대 길이
pub const MAX_EMAIL_LENGTH: usize = 254;
/// 하루 한 섹션에 기록할 수 있는 최대 연습 시간(분)
pub const MAX_MINUTES_PER_ENTRY: i64 = 300;
/// 섹션 하나의 하루 이상 연습 시간 상한(분): 하루 24시간
pub const MAX_IDEAL_DAILY_MINUTES: i64 = 1440;
/// 비밀번호 최소 길이
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// 에러 목록이 비어 있으면 Ok, 아니면 Validation 에러
fn finish(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// 간단한 이메일 형식 검사: `local@domain.tld`
///
/// - `@`가 정확히 하나
/// - `@` 앞뒤가 비어 있지 않음
/// - 도메인에 점이 있고, 점으로 시작하거나 끝나지 않음
/// - 공백 없음
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();

    if email.is_empty() {
        return Err("Email is required");
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err("Email is too long");
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email address");
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email address");
    };
    if local.is_empty() || domain.contains('@') {
        return Err("Invalid email address");
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email address");
    }

    Ok(())
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if let Err(message) = validate_email(email) {
        errors.push(FieldError::new("email", message));
    }
}

/// 루틴 템플릿: 이름 3자 이상, 섹션 1개 이상, 섹션 이름 필수, 이상 시간 0~1440분
pub fn validate_routine(req: &RoutineTemplateRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if char_len(&req.template_name) < 3 {
        errors.push(FieldError::new(
            "templateName",
            "Template name must be at least 3 characters",
        ));
    }
    if req.sections.is_empty() {
        errors.push(FieldError::new("sections", "Add at least one practice section"));
    }
    for (i, section) in req.sections.iter().enumerate() {
        if section.name.trim().is_empty() {
            errors.push(FieldError::new(
                format!("sections.{i}.name"),
                "Section name is required",
            ));
        }
        if section
            .ideal_daily_time_minutes
            .is_some_and(|m| !(0..=MAX_IDEAL_DAILY_MINUTES).contains(&m))
        {
            errors.push(FieldError::new(
                format!("sections.{i}.idealDailyTimeMinutes"),
                "Ideal time must be between 0 and 1440 minutes",
            ));
        }
    }

    finish(errors)
}

/// 학생 추가: 이름 2자 이상, 이메일 형식, 초기 비밀번호 6자 이상 (생략 가능)
pub fn validate_add_student(req: &AddStudentRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if char_len(&req.full_name) < 2 {
        errors.push(FieldError::new("fullName", "Full name must be at least 2 characters"));
    }
    check_email(&mut errors, &req.email);
    if let Some(password) = req.initial_password.as_deref() {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "initialPassword",
                "Password must be at least 6 characters",
            ));
        }
    }

    finish(errors)
}

/// 연습 기록: 섹션마다 0~300분
///
/// 날짜 형식과 과제 기간 검사는 핸들러에서 따로 합니다.
pub fn validate_practice_log(req: &SubmitPracticeLogRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    for (i, entry) in req.log_data.iter().enumerate() {
        if entry.section_id.trim().is_empty() {
            errors.push(FieldError::new(
                format!("logData.{i}.sectionId"),
                "Section is required",
            ));
        }
        if !(0..=MAX_MINUTES_PER_ENTRY).contains(&entry.time_spent_minutes) {
            errors.push(FieldError::new(
                format!("logData.{i}.timeSpentMinutes"),
                "Practice time must be between 0 and 300 minutes",
            ));
        }
    }

    finish(errors)
}

/// 이력서: 악기/장르 필수, 연차는 0 이상
pub fn validate_resume(req: &SaveResumeRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if req.instruments_taught.trim().is_empty() {
        errors.push(FieldError::new(
            "instrumentsTaught",
            "Please list at least one instrument.",
        ));
    }
    if req.music_genres.trim().is_empty() {
        errors.push(FieldError::new("musicGenres", "Please list at least one genre."));
    }
    if req.years_teaching.is_some_and(|y| y < 0) {
        errors.push(FieldError::new(
            "yearsTeaching",
            "Years of teaching must be non-negative.",
        ));
    }
    if req.years_performing.is_some_and(|y| y < 0) {
        errors.push(FieldError::new(
            "yearsPerforming",
            "Years of performing must be non-negative.",
        ));
    }

    finish(errors)
}

pub fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_email(&mut errors, &req.email);
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new("password", "Password must be at least 6 characters"));
    }

    finish(errors)
}

pub fn validate_signup(req: &SignupRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if char_len(&req.full_name) < 2 {
        errors.push(FieldError::new("fullName", "Full name must be at least 2 characters"));
    }
    check_email(&mut errors, &req.email);
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new("password", "Password must be at least 6 characters"));
    }

    finish(errors)
}

pub fn validate_display_name(req: &UpdateDisplayNameRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if char_len(&req.display_name) < 2 {
        errors.push(FieldError::new(
            "displayName",
            "Display name must be at least 2 characters",
        ));
    }

    finish(errors)
}

/// 비밀번호 변경: 새 비밀번호 6자 이상, 확인 값과 일치
///
/// 학생의 현재 비밀번호 확인은 저장된 값과 비교해야 하므로 핸들러가 합니다.
pub fn validate_password_change(req: &ChangePasswordRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if req.new_password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "newPassword",
            "New password must be at least 6 characters",
        ));
    }
    if req.new_password != req.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords don't match"));
    }

    finish(errors)
}
