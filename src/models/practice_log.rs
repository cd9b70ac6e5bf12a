//! # 일일 연습 기록 모델
//!
//! 학생이 하루 단위로 제출하는 연습 기록을 정의합니다.
//!
//! ## 교체 규칙
//! `(student_id, date, routine_template_id)` 조합마다 기록은 최대 하나입니다.
//! 같은 조합으로 다시 제출하면 이전 기록을 지우고 새 기록으로 바꿉니다.
//! 루틴이 바뀐 뒤의 과거 기록은 지워지지 않고 그대로 남습니다.

use serde::{Deserialize, Serialize};

/// 섹션별 연습 시간 한 줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPracticeLogEntry {
    pub section_id: String,
    pub section_name: String,
    pub time_spent_minutes: u32,
}

/// 일일 연습 기록: `noteWisePracticeLogs` 컬렉션의 원소 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPracticeLog {
    pub id: String,
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_template_id: Option<String>,
    /// 연습한 날짜 (`YYYY-MM-DD`)
    pub date: String,
    #[serde(default)]
    pub log_data: Vec<DailyPracticeLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_notes: Option<String>,
}

impl DailyPracticeLog {
    /// 이 기록의 총 연습 시간(분)
    pub fn total_minutes(&self) -> u32 {
        self.log_data
            .iter()
            .map(|e| e.time_spent_minutes)
            .fold(0u32, u32::saturating_add)
    }

    /// 교체 키가 같은지 확인합니다: 같은 학생, 같은 날짜, 같은 루틴
    pub fn same_slot(&self, student_id: &str, date: &str, routine_template_id: Option<&str>) -> bool {
        self.student_id == student_id
            && self.date == date
            && self.routine_template_id.as_deref() == routine_template_id
    }
}

/// 제출 요청의 섹션 한 줄: 검증 전이라 분 단위 값을 i64로 받습니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryInput {
    #[serde(default)]
    pub section_id: String,
    #[serde(default)]
    pub section_name: String,
    #[serde(default)]
    pub time_spent_minutes: i64,
}

/// 연습 기록 제출 요청: `POST /api/v1/student/practice`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPracticeLogRequest {
    /// 연습 날짜 (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub log_data: Vec<LogEntryInput>,
    pub daily_notes: Option<String>,
}
