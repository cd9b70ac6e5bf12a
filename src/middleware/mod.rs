//! 요청 인증: JWT 액세스 토큰과 `AuthUser` 추출기

pub mod auth;
