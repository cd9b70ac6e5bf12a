//! # 인증 추출기와 토큰 유틸리티
//!
//! 로그인하면 JWT 액세스 토큰을 발급하고, 토큰의 SHA-256 해시를 키로
//! `SessionStore`에 세션을 엽니다. 요청마다 `AuthUser` 추출기가
//! 서명/만료를 확인한 뒤 세션이 아직 열려 있는지 확인합니다.
//! 로그아웃한 토큰은 서명이 유효해도 거부됩니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::models::{Role, SessionUser};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // uid
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// 같은 초에 발급된 토큰도 서로 다른 해시를 갖게 하는 고유 값
    pub jti: String,
}

/// 인증된 요청의 사용자
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: SessionUser,
    /// 로그아웃 때 세션을 닫기 위한 토큰 해시
    pub token_hash: String,
}

impl AuthUser {
    /// 선생님 전용 핸들러에서 호출합니다.
    pub fn require_teacher(&self) -> Result<&SessionUser, AppError> {
        match self.user.role {
            Role::Teacher => Ok(&self.user),
            Role::Student => Err(AppError::Forbidden("Teacher account required".to_string())),
        }
    }

    /// 학생 전용 핸들러에서 호출합니다.
    pub fn require_student(&self) -> Result<&SessionUser, AppError> {
        match self.user.role {
            Role::Student => Ok(&self.user),
            Role::Teacher => Err(AppError::Forbidden("Student account required".to_string())),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_access_token(token, &state.jwt_secret)?;

        let token_hash = hash_token(token);
        let user = state
            .sessions
            .get(&token_hash)
            .await
            .ok_or(AuthError::SessionClosed)?;

        // 세션과 토큰의 주인이 다르면 위조로 간주
        if user.uid != claims.sub || user.role != claims.role {
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthUser { user, token_hash })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    SessionClosed,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
            AuthError::SessionClosed => (
                StatusCode::UNAUTHORIZED,
                "session_closed",
                "Session has ended, please log in again",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// 액세스 토큰을 만듭니다. 만료 시각도 함께 돌려줍니다.
pub fn create_access_token(
    user: &SessionUser,
    secret: &str,
    ttl_hours: i64,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);
    let claims = Claims {
        sub: user.uid.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: uuid::Uuid::now_v7().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, expires_at))
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
