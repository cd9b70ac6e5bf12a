//! 테마/언어 환경설정: 각각 문자열 하나로 저장됩니다.

use sqlx::SqlitePool;

use crate::db::storage::{self, LANGUAGE_KEY, THEME_KEY};
use crate::error::AppError;
use crate::models::{Language, Theme};

pub async fn get_theme(pool: &SqlitePool) -> Result<Theme, AppError> {
    storage::get_item(pool, THEME_KEY, Theme::default()).await
}

pub async fn set_theme(pool: &SqlitePool, theme: Theme) -> Result<(), AppError> {
    storage::set_item(pool, THEME_KEY, &theme).await
}

pub async fn get_language(pool: &SqlitePool) -> Result<Language, AppError> {
    storage::get_item(pool, LANGUAGE_KEY, Language::default()).await
}

pub async fn set_language(pool: &SqlitePool, language: Language) -> Result<(), AppError> {
    storage::set_item(pool, LANGUAGE_KEY, &language).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let pool = db::test_pool().await;
        assert_eq!(get_theme(&pool).await.unwrap(), Theme::System);
        assert_eq!(get_language(&pool).await.unwrap(), Language::En);
    }

    #[tokio::test]
    async fn test_unknown_value_falls_back() {
        let pool = db::test_pool().await;
        storage::set_raw(&pool, THEME_KEY, "\"neon\"").await.unwrap();
        assert_eq!(get_theme(&pool).await.unwrap(), Theme::System);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let pool = db::test_pool().await;
        set_theme(&pool, Theme::Dark).await.unwrap();
        set_language(&pool, Language::Fa).await.unwrap();

        assert_eq!(get_theme(&pool).await.unwrap(), Theme::Dark);
        assert_eq!(get_language(&pool).await.unwrap(), Language::Fa);
        assert_eq!(storage::get_raw(&pool, THEME_KEY).await.unwrap().as_deref(), Some("\"dark\""));
    }
}
