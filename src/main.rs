//! # NoteWise 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션
//! 4. 비어 있는 컬렉션에 데모 데이터 채우기
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use notewise::{
    build_router,
    config::Config,
    db,
    services::{seed, session::SessionStore},
    AppState,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅 초기화 ──
    // RUST_LOG가 없으면 notewise, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notewise=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting NoteWise server on {}:{}", config.host, config.port);
    if config.cloud.is_configured() {
        tracing::info!("Cloud backend settings found but unused; data stays in local storage");
    }

    // ── 4단계: 저장소 준비 ──
    // "sqlite:data/notewise.db" 같은 파일 경로라면 상위 디렉토리를 먼저 만듭니다.
    if let Some(parent) = sqlite_parent_dir(&config.database_url) {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created data directory: {}", parent.display());
        }
    }
    let pool = db::connect(&config.database_url, 5).await?;

    if config.seed_demo_data {
        seed::seed_demo_data(&pool).await?;
    }

    // ── 5단계: 상태와 라우터 ──
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        sessions: SessionStore::new(),
        session_ttl_hours: config.session_ttl_hours,
    };
    let app = build_router(state);

    // ── 6단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `sqlite:` URL에서 DB 파일의 상위 디렉토리를 꺼냅니다. 메모리 DB면 None.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
}
