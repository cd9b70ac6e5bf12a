//! # 학생 모델
//!
//! `noteWiseStudents` 컬렉션에 저장되는 학생 레코드와
//! 학생 관련 요청/응답 구조체를 정의합니다.
//!
//! 현재 배정된 루틴 정보(`current_routine_*`)는 학생 레코드 안에 함께 저장되며,
//! 새 루틴을 배정할 때마다 덮어씁니다.

use serde::{Deserialize, Serialize};

/// 학생 활동 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

/// 학생 레코드: 저장소에 기록되는 모양 그대로입니다.
///
/// 비밀번호는 모의(mock) 인증용 평문입니다. API 응답에는
/// 절대 포함하지 않도록 `StudentResponse`로 변환해서 내보냅니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub routines_assigned: u32,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default = "student_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    /// 현재 루틴 이름 (표시용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_routine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_routine_id: Option<String>,
    /// 루틴 배정일 (ISO 8601 문자열): 8일 과제 기간의 시작점
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_routine_assignment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_routine_ideal_weekly_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_routine_progress_percent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_date: Option<String>,
}

fn student_role() -> String {
    "student".to_string()
}

impl StudentData {
    /// 로그인/중복 검사에 쓰는 정규화된 이메일 (앞뒤 공백 제거 + 소문자)
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

/// 이메일 정규화: 앞뒤 공백 제거 후 소문자로 변환
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 이름 머리글자로 만든 자리표시자 아바타 URL
///
/// 예: "Alice Wonderland" → `https://placehold.co/40x40.png?text=AW`
pub fn avatar_url(display_name: &str) -> String {
    let initials: String = display_name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase();
    let initials = if initials.is_empty() {
        "N/A".to_string()
    } else {
        initials
    };
    format!("https://placehold.co/40x40.png?text={}", initials)
}

/// API 응답용 학생 정보: 비밀번호를 제외한 나머지 필드
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub avatar: String,
    pub routines_assigned: u32,
    pub status: StudentStatus,
    pub role: String,
    pub teacher_id: Option<String>,
    pub teacher_name: Option<String>,
    pub current_routine: Option<String>,
    pub current_routine_id: Option<String>,
    pub current_routine_assignment_date: Option<String>,
    pub current_routine_ideal_weekly_time: Option<u32>,
    pub current_routine_progress_percent: u32,
    pub joined_date: Option<String>,
}

impl From<StudentData> for StudentResponse {
    fn from(s: StudentData) -> Self {
        Self {
            id: s.id,
            display_name: s.display_name,
            email: s.email,
            avatar: s.avatar,
            routines_assigned: s.routines_assigned,
            status: s.status,
            role: s.role,
            teacher_id: s.teacher_id,
            teacher_name: s.teacher_name,
            current_routine: s.current_routine,
            current_routine_id: s.current_routine_id,
            current_routine_assignment_date: s.current_routine_assignment_date,
            current_routine_ideal_weekly_time: s.current_routine_ideal_weekly_time,
            current_routine_progress_percent: s.current_routine_progress_percent.unwrap_or(0),
            joined_date: s.joined_date,
        }
    }
}

/// 학생 추가 요청: `POST /api/v1/teacher/students`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStudentRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    /// 초기 비밀번호: 생략하면 "password"
    pub initial_password: Option<String>,
}

/// 루틴 배정 요청: `POST /api/v1/teacher/students/{id}/assignment`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoutineRequest {
    pub template_id: Option<String>,
    /// 과제 시작일 (`YYYY-MM-DD`): 생략하면 오늘
    pub start_date: Option<String>,
}
