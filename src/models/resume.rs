//! # 선생님 이력서 모델
//!
//! 선생님 한 명당 하나의 이력서를 가지며, `noteWiseTeacherResumes`
//! 맵(선생님 ID → 이력서)에 저장됩니다. 연결된 학생이 읽어 갑니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeacherResume {
    /// 선생님 ID (맵의 키와 같음)
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_bio: Option<String>,
    /// 쉼표로 구분한 악기 목록
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruments_taught: Option<String>,
    /// 쉼표로 구분한 장르 목록
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_genres: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_teaching: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formal_education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaching_philosophy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_performing: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_orchestra_memberships: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honors_memberships: Option<String>,
}

/// 이력서 저장 요청: `PUT /api/v1/teacher/resume`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveResumeRequest {
    pub short_bio: Option<String>,
    #[serde(default)]
    pub instruments_taught: String,
    #[serde(default)]
    pub music_genres: String,
    pub years_teaching: Option<i64>,
    pub formal_education: Option<String>,
    pub teaching_philosophy: Option<String>,
    pub years_performing: Option<i64>,
    pub band_orchestra_memberships: Option<String>,
    pub certifications: Option<String>,
    pub honors_memberships: Option<String>,
}

/// 학생이 보는 선생님 프로필: `GET /api/v1/student/teacher-profile`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfileResponse {
    pub teacher_name: Option<String>,
    /// 악기/장르 문자열을 쉼표로 나눠 정리한 목록
    pub instruments: Vec<String>,
    pub genres: Vec<String>,
    pub resume: TeacherResume,
}

/// 쉼표로 구분된 문자열을 공백을 다듬은 항목 목록으로 나눕니다. 빈 항목은 버립니다.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
