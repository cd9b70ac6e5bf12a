//! # Key-Value 문서 저장소
//!
//! 브라우저의 localStorage처럼 동작하는 저장 계층입니다.
//! `kv_store` 테이블의 한 행이 하나의 key에 해당하고,
//! 값은 컬렉션 전체를 직렬화한 JSON 문자열입니다.
//!
//! ## 계약
//! - 읽기: 값이 없거나 JSON이 깨져 있으면 호출자가 준 기본값을 돌려줍니다.
//! - 쓰기: 항상 전체 값을 통째로 덮어씁니다 (마지막 쓰기가 이김).
//!
//! 모든 컬렉션 모듈은 "전체 읽기 → 원소 하나 수정 → 전체 쓰기" 순서를 따릅니다.

use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;

use crate::error::AppError;

// ── 저장 key 목록 ──
pub const ROUTINES_KEY: &str = "noteWiseRoutines";
pub const STUDENTS_KEY: &str = "noteWiseStudents";
pub const PRACTICE_LOGS_KEY: &str = "noteWisePracticeLogs";
pub const TEACHER_RESUMES_KEY: &str = "noteWiseTeacherResumes";
pub const THEME_KEY: &str = "noteWiseTheme";
pub const LANGUAGE_KEY: &str = "noteWiseLanguage";

/// key에 저장된 JSON 값을 읽어 `T`로 변환합니다.
///
/// 값이 없거나 `T`로 해석할 수 없으면 `default`를 반환합니다.
/// 손상된 값은 경고 로그만 남기고 넘어갑니다: 다음 쓰기에서 덮어써집니다.
/// 데이터베이스 자체의 오류는 그대로 전파합니다.
pub async fn get_item<T>(pool: &SqlitePool, key: &str, default: T) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let raw = get_raw(pool, key).await?;

    let Some(raw) = raw else {
        return Ok(default);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Corrupt value in storage, falling back to default");
            Ok(default)
        }
    }
}

/// 값을 JSON으로 직렬화하여 key에 저장합니다 (있으면 덮어쓰기).
pub async fn set_item<T>(pool: &SqlitePool, key: &str, value: &T) -> Result<(), AppError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    set_raw(pool, key, &raw).await
}

/// key를 삭제합니다. 삭제된 행이 있으면 true.
pub async fn remove_item(pool: &SqlitePool, key: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 저장된 원문 문자열을 그대로 읽습니다.
pub async fn get_raw(pool: &SqlitePool, key: &str) -> Result<Option<String>, AppError> {
    let row = sqlx::query_as::<_, (String,)>("SELECT value FROM kv_store WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// 원문 문자열을 그대로 저장합니다.
///
/// `ON CONFLICT ... DO UPDATE`: key가 이미 있으면 값과 수정 시각만 바꿉니다 (upsert).
pub async fn set_raw(pool: &SqlitePool, key: &str, raw: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE
        SET value = excluded.value,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(key)
    .bind(raw)
    .execute(pool)
    .await?;

    tracing::debug!(key, bytes = raw.len(), "Stored collection");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_missing_key_returns_default() {
        let pool = db::test_pool().await;
        let value: Vec<String> = get_item(&pool, "nothing-here", vec!["x".to_string()])
            .await
            .unwrap();
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let pool = db::test_pool().await;
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1u32);
        set_item(&pool, "numbers", &map).await.unwrap();

        let loaded: HashMap<String, u32> = get_item(&pool, "numbers", HashMap::new()).await.unwrap();
        assert_eq!(loaded.get("a"), Some(&1));
    }

    #[tokio::test]
    async fn test_corrupt_value_falls_back_to_default() {
        let pool = db::test_pool().await;
        set_raw(&pool, STUDENTS_KEY, "{not json").await.unwrap();

        let loaded: Vec<u32> = get_item(&pool, STUDENTS_KEY, Vec::new()).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_falls_back_to_default() {
        let pool = db::test_pool().await;
        // 배열을 기대하는 자리에 객체가 저장된 경우
        set_raw(&pool, ROUTINES_KEY, r#"{"id": "rt1"}"#).await.unwrap();

        let loaded: Vec<String> = get_item(&pool, ROUTINES_KEY, Vec::new()).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_value() {
        let pool = db::test_pool().await;
        set_item(&pool, "list", &vec![1, 2, 3]).await.unwrap();
        set_item(&pool, "list", &vec![9]).await.unwrap();

        let loaded: Vec<i32> = get_item(&pool, "list", Vec::new()).await.unwrap();
        assert_eq!(loaded, vec![9]);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let pool = db::test_pool().await;
        set_item(&pool, THEME_KEY, "dark").await.unwrap();
        assert!(remove_item(&pool, THEME_KEY).await.unwrap());
        assert!(!remove_item(&pool, THEME_KEY).await.unwrap());
        assert_eq!(get_raw(&pool, THEME_KEY).await.unwrap(), None);
    }
}
