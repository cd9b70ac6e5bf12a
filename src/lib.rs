//! # NoteWise: 음악 연습 관리 서버
//!
//! 선생님이 연습 루틴 템플릿을 만들어 학생에게 8일 과제로 배정하고,
//! 학생은 매일 섹션별 연습 시간을 기록합니다.
//! 서버는 진도율과 차트 데이터를 계산합니다.
//!
//! 모든 데이터는 SQLite의 key-value 테이블에 컬렉션 단위 JSON으로 저장됩니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// 전체 애플리케이션 라우터를 만듭니다.
///
/// API는 `/api/v1` 아래에 중첩되고, CORS와 요청 로깅 미들웨어가 붙습니다.
/// 통합 테스트도 이 함수로 같은 라우터를 만듭니다.
pub fn build_router(state: AppState) -> Router {
    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
