//! # 세션 저장소 (Session Store)
//!
//! 로그인 세션과 "이번 프로세스 동안 가입한 선생님" 자격 증명을 메모리에 보관합니다.
//! 프로세스가 재시작되면 모두 사라집니다.
//!
//! ## 구조
//! - `sessions`: 액세스 토큰의 SHA-256 해시 → 로그인한 사용자
//! - `teacher_credentials`: 정규화된 이메일 → 선생님 자격 증명
//!
//! 로그아웃은 세션만 지우고 선생님 자격 증명은 남겨 둡니다.
//! 그래서 같은 프로세스 안에서는 가입한 선생님이 다시 로그인할 수 있습니다.
//!
//! `SessionStore`는 내부적으로 `Arc`를 쓰므로 clone해도 같은 저장소를 가리킵니다.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{normalize_email, SessionUser, TeacherCredentials};

/// 데모 선생님 계정
pub const DEMO_TEACHER_EMAIL: &str = "teacher@example.com";
pub const DEMO_TEACHER_PASSWORD: &str = "teacherpass";
pub const DEMO_TEACHER_UID: &str = "default-teacher-uid";
pub const DEMO_TEACHER_NAME: &str = "Demo Teacher";

#[derive(Debug, Clone)]
struct ActiveSession {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SessionState {
    sessions: HashMap<String, ActiveSession>,
    teacher_credentials: HashMap<String, TeacherCredentials>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

/// 데모 선생님 자격 증명
pub fn demo_teacher() -> TeacherCredentials {
    TeacherCredentials {
        uid: DEMO_TEACHER_UID.to_string(),
        email: DEMO_TEACHER_EMAIL.to_string(),
        password: DEMO_TEACHER_PASSWORD.to_string(),
        display_name: DEMO_TEACHER_NAME.to_string(),
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 세션을 엽니다. 그 김에 만료된 세션을 모두 정리합니다.
    pub async fn open(&self, token_hash: String, user: SessionUser, expires_at: DateTime<Utc>) {
        let mut state = self.inner.write().await;

        let now = Utc::now();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at > now);
        let pruned = before - state.sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned expired sessions");
        }

        tracing::debug!(uid = %user.uid, role = ?user.role, "Session opened");
        state.sessions.insert(token_hash, ActiveSession { user, expires_at });
    }

    /// 토큰 해시로 세션 사용자를 찾습니다. 만료된 세션은 지우고 None.
    pub async fn get(&self, token_hash: &str) -> Option<SessionUser> {
        {
            let state = self.inner.read().await;
            match state.sessions.get(token_hash) {
                Some(session) if session.expires_at > Utc::now() => {
                    return Some(session.user.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // 만료된 세션 정리
        let mut state = self.inner.write().await;
        state.sessions.remove(token_hash);
        None
    }

    /// 세션을 닫습니다. 선생님 자격 증명은 그대로 둡니다.
    pub async fn close(&self, token_hash: &str) -> bool {
        let mut state = self.inner.write().await;
        state.sessions.remove(token_hash).is_some()
    }

    /// 같은 uid로 열린 모든 세션의 표시 이름을 바꿉니다.
    pub async fn rename_user(&self, uid: &str, display_name: &str) {
        let mut state = self.inner.write().await;
        for session in state.sessions.values_mut() {
            if session.user.uid == uid {
                session.user.display_name = display_name.to_string();
            }
        }
    }

    /// 선생님 자격 증명을 등록합니다 (같은 이메일이면 덮어쓰기).
    pub async fn register_teacher(&self, credentials: TeacherCredentials) {
        let mut state = self.inner.write().await;
        let key = normalize_email(&credentials.email);
        tracing::debug!(uid = %credentials.uid, "Registered teacher credentials");
        state.teacher_credentials.insert(key, credentials);
    }

    /// 가입한 선생님을 새 uid(`teacher-<밀리초>`)로 등록합니다.
    ///
    /// 이메일이 데모 선생님이거나 이미 등록되어 있으면 None.
    /// 같은 밀리초에 가입이 겹치면 숫자를 하나씩 올려 uid가 겹치지 않게 합니다.
    pub async fn register_new_teacher(
        &self,
        email: &str,
        password: String,
        display_name: String,
    ) -> Option<TeacherCredentials> {
        let mut state = self.inner.write().await;
        let key = normalize_email(email);
        if key == DEMO_TEACHER_EMAIL || state.teacher_credentials.contains_key(&key) {
            return None;
        }

        let mut millis = Utc::now().timestamp_millis();
        let uid = loop {
            let candidate = format!("teacher-{millis}");
            if !state.teacher_credentials.values().any(|c| c.uid == candidate) {
                break candidate;
            }
            millis += 1;
        };

        let credentials = TeacherCredentials {
            uid,
            email: key.clone(),
            password,
            display_name,
        };
        tracing::debug!(uid = %credentials.uid, "Registered teacher credentials");
        state.teacher_credentials.insert(key, credentials.clone());
        Some(credentials)
    }

    pub async fn teacher_by_email(&self, email: &str) -> Option<TeacherCredentials> {
        let state = self.inner.read().await;
        state.teacher_credentials.get(&normalize_email(email)).cloned()
    }

    pub async fn teacher_by_uid(&self, uid: &str) -> Option<TeacherCredentials> {
        let state = self.inner.read().await;
        state
            .teacher_credentials
            .values()
            .find(|c| c.uid == uid)
            .cloned()
    }

    /// 선생님 로그인을 확인합니다.
    ///
    /// 1. 이번 프로세스에 등록된 자격 증명
    /// 2. 데모 선생님 (성공하면 자격 증명을 등록)
    pub async fn authenticate_teacher(&self, email: &str, password: &str) -> Option<SessionUser> {
        let email = normalize_email(email);

        if let Some(credentials) = self.teacher_by_email(&email).await {
            return (credentials.password == password).then(|| credentials.session_user());
        }

        let demo = demo_teacher();
        if email == demo.email && password == demo.password {
            let user = demo.session_user();
            self.register_teacher(demo).await;
            return Some(user);
        }

        None
    }

    /// 선생님 자격 증명을 수정합니다. 등록된 자격 증명이 없으면 false.
    pub async fn update_teacher<F>(&self, uid: &str, apply: F) -> bool
    where
        F: FnOnce(&mut TeacherCredentials),
    {
        let mut state = self.inner.write().await;
        match state.teacher_credentials.values_mut().find(|c| c.uid == uid) {
            Some(credentials) => {
                apply(credentials);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Duration;

    fn student_user() -> SessionUser {
        SessionUser {
            uid: "stu-1".to_string(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn test_open_get_close() {
        let store = SessionStore::new();
        store
            .open("hash".to_string(), student_user(), Utc::now() + Duration::hours(1))
            .await;

        assert_eq!(store.get("hash").await, Some(student_user()));
        assert!(store.close("hash").await);
        assert_eq!(store.get("hash").await, None);
        assert!(!store.close("hash").await);
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let store = SessionStore::new();
        store
            .open("hash".to_string(), student_user(), Utc::now() - Duration::seconds(1))
            .await;
        assert_eq!(store.get("hash").await, None);
    }

    #[tokio::test]
    async fn test_open_prunes_expired_sessions() {
        let store = SessionStore::new();
        for i in 0..3 {
            store
                .open(format!("old-{i}"), student_user(), Utc::now() - Duration::seconds(1))
                .await;
        }
        store
            .open("fresh".to_string(), student_user(), Utc::now() + Duration::hours(1))
            .await;

        let state = store.inner.read().await;
        assert_eq!(state.sessions.len(), 1);
        assert!(state.sessions.contains_key("fresh"));
    }

    #[tokio::test]
    async fn test_new_teachers_get_distinct_uids() {
        let store = SessionStore::new();
        let mut uids = Vec::new();
        for i in 0..5 {
            let credentials = store
                .register_new_teacher(
                    &format!("t{i}@example.com"),
                    "secret1".to_string(),
                    format!("Teacher {i}"),
                )
                .await
                .unwrap();
            assert!(credentials.uid.starts_with("teacher-"));
            uids.push(credentials.uid);
        }
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), 5);

        for uid in &uids {
            assert!(store.teacher_by_uid(uid).await.is_some());
        }
    }

    #[tokio::test]
    async fn test_new_teacher_rejects_taken_email() {
        let store = SessionStore::new();
        assert!(store
            .register_new_teacher(" T0@Example.com ", "secret1".to_string(), "T".to_string())
            .await
            .is_some());
        assert!(store
            .register_new_teacher("t0@example.com", "secret2".to_string(), "T".to_string())
            .await
            .is_none());
        assert!(store
            .register_new_teacher(DEMO_TEACHER_EMAIL, "secret2".to_string(), "T".to_string())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_demo_teacher_login_registers_credentials() {
        let store = SessionStore::new();
        assert!(store.teacher_by_email(DEMO_TEACHER_EMAIL).await.is_none());

        let user = store
            .authenticate_teacher(" Teacher@Example.com ", DEMO_TEACHER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(user.uid, DEMO_TEACHER_UID);
        assert_eq!(user.role, Role::Teacher);
        assert!(store.teacher_by_email(DEMO_TEACHER_EMAIL).await.is_some());

        assert!(store
            .authenticate_teacher(DEMO_TEACHER_EMAIL, "wrong-pass")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_registered_teacher_survives_logout() {
        let store = SessionStore::new();
        store
            .register_teacher(TeacherCredentials {
                uid: "teacher-1".to_string(),
                email: "new@example.com".to_string(),
                password: "secret1".to_string(),
                display_name: "New Teacher".to_string(),
            })
            .await;

        let user = store.authenticate_teacher("new@example.com", "secret1").await.unwrap();
        store
            .open("hash".to_string(), user.clone(), Utc::now() + Duration::hours(1))
            .await;
        store.close("hash").await;

        assert_eq!(
            store.authenticate_teacher("NEW@example.com", "secret1").await,
            Some(user)
        );
    }

    #[tokio::test]
    async fn test_update_teacher_and_rename_sessions() {
        let store = SessionStore::new();
        store.register_teacher(demo_teacher()).await;
        store
            .open("hash".to_string(), demo_teacher().session_user(), Utc::now() + Duration::hours(1))
            .await;

        assert!(store.update_teacher(DEMO_TEACHER_UID, |c| c.display_name = "Maestro".to_string()).await);
        store.rename_user(DEMO_TEACHER_UID, "Maestro").await;

        assert_eq!(store.get("hash").await.unwrap().display_name, "Maestro");
        assert_eq!(
            store.teacher_by_uid(DEMO_TEACHER_UID).await.unwrap().display_name,
            "Maestro"
        );
        assert!(!store.update_teacher("nobody", |_| {}).await);
    }
}
