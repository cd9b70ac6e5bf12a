//! # 인증 라우트 핸들러 (모의 인증)
//!
//! ## 엔드포인트
//! - `POST /api/v1/auth/signup` → 선생님 회원가입 + 로그인
//! - `POST /api/v1/auth/login`  → 학생 또는 선생님 로그인
//! - `POST /api/v1/auth/logout` → 현재 세션 종료
//! - `GET  /api/v1/auth/me`     → 현재 세션 사용자
//!
//! 비밀번호는 평문으로 비교합니다. 실제 인증 시스템이 아닙니다.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    db,
    error::AppError,
    middleware::auth::{create_access_token, hash_token, AuthUser},
    models::*,
    state::AppState,
    validation,
};

/// 로그인 실패 시 항상 같은 메시지를 돌려줍니다 (어느 단계에서 실패했는지 숨김).
pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please check your email and password.";

/// 토큰을 발급하고 세션을 엽니다.
async fn open_session(state: &AppState, user: SessionUser) -> Result<AuthResponse, AppError> {
    let (access_token, expires_at) =
        create_access_token(&user, &state.jwt_secret, state.session_ttl_hours)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    state
        .sessions
        .open(hash_token(&access_token), user.clone(), expires_at)
        .await;

    Ok(AuthResponse { user, access_token })
}

/// 학생 레코드 중 이메일과 비밀번호가 모두 맞는 학생을 찾습니다.
async fn authenticate_student(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Option<SessionUser>, AppError> {
    let student = db::students::find_student_by_email(&state.pool, email).await?;

    Ok(student
        .filter(|s| s.password.as_deref() == Some(password))
        .map(|s| SessionUser {
            uid: s.id,
            email: normalize_email(&s.email),
            display_name: s.display_name,
            role: Role::Student,
        }))
}

/// `POST /auth/signup`: 선생님 계정을 만들고 바로 로그인합니다.
///
/// 선생님 ID는 `teacher-<밀리초 타임스탬프>` 형식이며 겹치지 않습니다.
/// 자격 증명은 이번 프로세스 동안만 유지됩니다.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validation::validate_signup(&req)?;

    let email_taken = || AppError::Conflict("An account with this email already exists".to_string());

    let email = normalize_email(&req.email);
    if db::students::find_student_by_email(&state.pool, &email)
        .await?
        .is_some()
    {
        return Err(email_taken());
    }

    let credentials = state
        .sessions
        .register_new_teacher(&email, req.password, req.full_name.trim().to_string())
        .await
        .ok_or_else(email_taken)?;
    let user = credentials.session_user();

    tracing::info!(uid = %user.uid, "Teacher signed up");
    let response = open_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /auth/login`
///
/// 확인 순서:
/// 1. 학생 레코드 (이메일 + 저장된 비밀번호)
/// 2. 이번 프로세스에 가입한 선생님
/// 3. 데모 선생님
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validation::validate_login(&req)?;

    let user = match authenticate_student(&state, &req.email, &req.password).await? {
        Some(user) => Some(user),
        None => state.sessions.authenticate_teacher(&req.email, &req.password).await,
    };

    let Some(user) = user else {
        tracing::debug!("Login failed");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    tracing::info!(uid = %user.uid, role = ?user.role, "Logged in");
    Ok(Json(open_session(&state, user).await?))
}

/// `POST /auth/logout`: 세션을 닫습니다. 가입한 선생님 자격 증명은 남습니다.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> StatusCode {
    state.sessions.close(&auth_user.token_hash).await;
    tracing::info!(uid = %auth_user.user.uid, "Logged out");
    StatusCode::NO_CONTENT
}

/// `GET /auth/me`
pub async fn me(auth_user: AuthUser) -> Json<SessionUser> {
    Json(auth_user.user)
}
