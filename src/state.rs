use sqlx::SqlitePool;

use crate::services::session::SessionStore;

// #[derive(Clone)]: Axum의 State Extractor는 내부적으로 AppState를 clone하므로 필수입니다.
// SqlitePool과 SessionStore는 둘 다 Arc로 공유되므로 clone해도 같은 대상을 가리킵니다.

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// key-value 저장소가 들어 있는 SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 로그인 세션 저장소 (프로세스 메모리)
    pub sessions: SessionStore,
    /// 액세스 토큰 유효 시간 (시간)
    pub session_ttl_hours: i64,
}
