//! # 연습 루틴 템플릿 모델
//!
//! 선생님이 한 번 만들어 두고 여러 학생에게 반복해서 배정하는
//! 연습 루틴(Routine Template)과 그 하위 섹션(Practice Section)을 정의합니다.
//!
//! ## 주간 이상 연습 시간
//! 과제 기간은 8일이므로, 템플릿의 이상적인 주간 연습 시간은
//! `8 × (각 섹션의 하루 이상 연습 시간 합)`으로 계산합니다.
//! 이 값은 템플릿을 만들거나 수정할 때마다 다시 계산됩니다.

use serde::{Deserialize, Serialize};

use crate::services::progress::WINDOW_DAYS;

/// 루틴 안의 연습 섹션 하나 (예: "C Major scales")
///
/// 저장되는 JSON의 필드 이름은 camelCase를 따릅니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 하루 이상 연습 시간(분). 없으면 0으로 취급합니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_daily_time_minutes: Option<u32>,
}

/// 연습 루틴 템플릿: `noteWiseRoutines` 컬렉션의 원소 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineTemplate {
    pub id: String,
    pub template_name: String,
    /// 섹션 목록: 순서가 의미를 가지므로 Vec 그대로 유지합니다.
    #[serde(default)]
    pub sections: Vec<PracticeSection>,
    /// 마지막 수정 시각 (RFC 3339)
    pub last_modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_ideal_weekly_time: Option<u32>,
}

impl RoutineTemplate {
    /// 모든 섹션의 하루 이상 연습 시간 합계 (차트의 "이상 연습량" 막대)
    ///
    /// 저장된 값이 비정상적으로 커도 넘치지 않고 `u32::MAX`에서 멈춥니다.
    pub fn total_ideal_daily_minutes(&self) -> u32 {
        self.sections
            .iter()
            .map(|s| s.ideal_daily_time_minutes.unwrap_or(0))
            .fold(0u32, u32::saturating_add)
    }

    /// 8일 과제 기간 기준의 이상 주간 연습 시간
    pub fn ideal_weekly_minutes(&self) -> u32 {
        self.total_ideal_daily_minutes()
            .saturating_mul(WINDOW_DAYS as u32)
    }
}

/// 섹션 입력: 생성/수정 요청 본문 안의 섹션 하나
///
/// `id`가 없으면 서버가 새로 발급합니다.
/// 수정 시 기존 id를 보내면 그대로 유지되어 과거 연습 기록과 연결이 끊기지 않습니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSectionInput {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    /// 음수 입력도 받아서 검증 단계에서 필드 에러로 돌려주기 위해 i64를 씁니다.
    pub ideal_daily_time_minutes: Option<i64>,
}

/// 루틴 템플릿 생성/수정 요청: `POST`/`PUT /api/v1/teacher/routines`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineTemplateRequest {
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub sections: Vec<PracticeSectionInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(minutes: &[Option<u32>]) -> RoutineTemplate {
        RoutineTemplate {
            id: "rt".to_string(),
            template_name: "Scales".to_string(),
            sections: minutes
                .iter()
                .enumerate()
                .map(|(i, m)| PracticeSection {
                    id: format!("s{i}"),
                    name: format!("Section {i}"),
                    description: None,
                    ideal_daily_time_minutes: *m,
                })
                .collect(),
            last_modified: "2024-01-01T00:00:00Z".to_string(),
            calculated_ideal_weekly_time: None,
        }
    }

    #[test]
    fn test_weekly_is_eight_times_daily() {
        let t = template(&[Some(10), None, Some(5)]);
        assert_eq!(t.total_ideal_daily_minutes(), 15);
        assert_eq!(t.ideal_weekly_minutes(), 120);
    }

    #[test]
    fn test_oversized_stored_values_saturate() {
        let t = template(&[Some(600_000_000)]);
        assert_eq!(t.ideal_weekly_minutes(), u32::MAX);

        let t = template(&[Some(u32::MAX), Some(1)]);
        assert_eq!(t.total_ideal_daily_minutes(), u32::MAX);
        assert_eq!(t.ideal_weekly_minutes(), u32::MAX);
    }
}
