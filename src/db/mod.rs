//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 저장소와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `storage`: key-value 저장소의 JSON get/set (기본값 대체 포함)
//! - `routines`: 루틴 템플릿 컬렉션
//! - `students`: 학생 컬렉션 (배정, 진도 기록 포함)
//! - `practice_logs`: 일일 연습 기록 컬렉션
//! - `resumes`: 선생님 이력서 맵
//! - `preferences`: 테마/언어 설정

pub mod practice_logs;
pub mod preferences;
pub mod resumes;
pub mod routines;
pub mod storage;
pub mod students;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// SQLite 연결 풀을 만들고 마이그레이션까지 실행합니다.
///
/// `?mode=rwc`가 없어도 `create_if_missing(true)`로 파일을 생성합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// 테스트용 인메모리 DB
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 하나로 제한합니다.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1).await.unwrap()
}
