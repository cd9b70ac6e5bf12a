//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (key-value 저장소)
//! - `JWT_SECRET`: 세션 토큰 서명에 사용할 비밀키
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `SESSION_TTL_HOURS`: 세션 토큰 유효 시간
//! - `SEED_DEMO_DATA`: 비어 있는 컬렉션에 데모 데이터를 채울지 여부
//! - `FIREBASE_*`: 클라우드 백엔드 자리표시자 (읽기만 하고 사용하지 않음)

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/notewise.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 로그인 세션(액세스 토큰)의 유효 시간, 시간 단위 (기본값: 12)
    pub session_ttl_hours: i64,
    /// 컬렉션이 비어 있으면 데모 루틴/학생을 채워 넣습니다 (기본값: true)
    pub seed_demo_data: bool,
    /// 클라우드 백엔드 연동용 자리표시자 설정
    pub cloud: CloudBackendConfig,
}

/// 클라우드 백엔드(Firebase) 자리표시자 설정
///
/// 값은 읽어 두지만 어디에서도 호출하지 않습니다.
/// 모든 데이터는 로컬 key-value 저장소에만 기록됩니다.
#[derive(Debug, Clone, Default)]
pub struct CloudBackendConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl CloudBackendConfig {
    fn from_env() -> Self {
        Self {
            api_key: env::var("FIREBASE_API_KEY").ok(),
            auth_domain: env::var("FIREBASE_AUTH_DOMAIN").ok(),
            project_id: env::var("FIREBASE_PROJECT_ID").ok(),
            storage_bucket: env::var("FIREBASE_STORAGE_BUCKET").ok(),
            messaging_sender_id: env::var("FIREBASE_MESSAGING_SENDER_ID").ok(),
            app_id: env::var("FIREBASE_APP_ID").ok(),
        }
    }

    /// 자리표시자 값이 하나라도 채워져 있는지 여부 (시작 로그용)
    pub fn is_configured(&self) -> bool {
        [
            &self.api_key,
            &self.auth_domain,
            &self.project_id,
            &self.storage_bucket,
            &self.messaging_sender_id,
            &self.app_id,
        ]
        .iter()
        .any(|v| v.is_some())
    }
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            jwt_secret: env::var("JWT_SECRET")?, // 필수: 없으면 에러

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/notewise.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            // 숫자 설정은 파싱 실패 시 기본값으로 대체합니다.
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(12),

            // "false", "0", "no"만 비활성화로 취급합니다.
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),

            cloud: CloudBackendConfig::from_env(),
        })
    }
}
