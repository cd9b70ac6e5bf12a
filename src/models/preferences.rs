//! # 화면 환경설정 모델
//!
//! 테마(`noteWiseTheme`)와 언어(`noteWiseLanguage`)는 각각 별도의 key에
//! 문자열 하나로 저장됩니다. 저장된 값이 없거나 알 수 없는 값이면 기본값을 씁니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

/// 텍스트 방향: 페르시아어(fa)는 오른쪽에서 왼쪽으로 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl Language {
    pub fn direction(self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Fa => TextDirection::Rtl,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferencesResponse {
    pub theme: Theme,
    pub language: Language,
    pub dir: TextDirection,
}

/// `PUT /api/v1/preferences`: 보낸 항목만 바꿉니다.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
}
