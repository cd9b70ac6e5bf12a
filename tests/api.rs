//! 라우터 통합 테스트
//!
//! 서버를 띄우지 않고 `tower::ServiceExt::oneshot`으로 요청을 직접 보냅니다.
//! 테스트마다 새 인메모리 DB와 세션 저장소를 씁니다.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use notewise::{build_router, db, services::seed, services::session::SessionStore, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    seed::seed_demo_data(&pool).await.unwrap();

    build_router(AppState {
        pool,
        jwt_secret: "test-secret".to_string(),
        sessions: SessionStore::new(),
        session_ttl_hours: 1,
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["accessToken"].as_str().unwrap().to_string()
}

async fn demo_teacher(app: &Router) -> String {
    login(app, "teacher@example.com", "teacherpass").await
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_demo_teacher_login_and_me() {
    let app = app().await;
    let token = login(&app, "  TEACHER@example.com ", "teacherpass").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], "default-teacher-uid");
    assert_eq!(body["displayName"], "Demo Teacher");
    assert_eq!(body["role"], "teacher");
}

#[tokio::test]
async fn test_bad_credentials_get_generic_message() {
    let app = app().await;
    for (email, password) in [
        ("teacher@example.com", "wrongpass"),
        ("alice@example.com", "not-her-password"),
        ("nobody@example.com", "whatever"),
    ] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["error"]["message"],
            "Invalid credentials. Please check your email and password."
        );
    }
}

#[tokio::test]
async fn test_login_form_validation() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/teacher/routines", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "missing_token");
}

#[tokio::test]
async fn test_logout_closes_session() {
    let app = app().await;
    let token = demo_teacher(&app).await;

    let (status, _) = send(&app, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "session_closed");
}

#[tokio::test]
async fn test_signup_then_relogin_after_logout() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "fullName": "Clara Schumann", "email": "Clara@Example.com", "password": "romance1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"]["uid"].as_str().unwrap().starts_with("teacher-"));
    assert_eq!(body["user"]["email"], "clara@example.com");
    let token = body["accessToken"].as_str().unwrap().to_string();

    // 새 선생님에게는 학생이 없습니다
    let (_, roster) = send(&app, Method::GET, "/api/v1/teacher/students", Some(&token), None).await;
    assert!(roster["students"].as_array().unwrap().is_empty());

    send(&app, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    login(&app, "clara@example.com", "romance1").await;
}

#[tokio::test]
async fn test_back_to_back_signups_get_distinct_accounts() {
    let app = app().await;
    let mut uids = Vec::new();
    for (name, email) in [("Fanny Hensel", "fanny@example.com"), ("Amy Beach", "amy@example.com")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({ "fullName": name, "email": email, "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        uids.push(body["user"]["uid"].as_str().unwrap().to_string());
    }
    assert_ne!(uids[0], uids[1]);

    for email in ["fanny@example.com", "teacher@example.com", "alice@example.com"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({ "fullName": "Someone", "email": email, "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    // 두 번째 선생님의 이름 변경이 첫 번째 계정에 영향을 주지 않습니다
    let token = login(&app, "amy@example.com", "secret1").await;
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/display-name",
        Some(&token),
        Some(json!({ "displayName": "Amy M. Beach" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = login(&app, "fanny@example.com", "secret1").await;
    let (_, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(me["displayName"], "Fanny Hensel");
}

#[tokio::test]
async fn test_dashboard_lists_demo_students() {
    let app = app().await;
    let token = demo_teacher(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/teacher/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalStudents"], 4);
    assert_eq!(body["activeStudents"], 3);
    // 비밀번호는 응답에 포함되지 않습니다
    assert!(body["students"][0].get("password").is_none());
}

#[tokio::test]
async fn test_routine_crud() {
    let app = app().await;
    let token = demo_teacher(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/routines",
        Some(&token),
        Some(json!({ "templateName": "ab", "sections": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_failed");

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/routines",
        Some(&token),
        Some(json!({
            "templateName": "Arpeggios",
            "sections": [
                { "name": "C Major", "idealDailyTimeMinutes": 10 },
                { "name": "A Minor", "description": "hands separately", "idealDailyTimeMinutes": 5 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["calculatedIdealWeeklyTime"], 120);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/teacher/routines/{id}"),
        Some(&token),
        Some(json!({
            "templateName": "Arpeggios II",
            "sections": [{ "name": "C Major", "idealDailyTimeMinutes": 20 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["calculatedIdealWeeklyTime"], 160);

    let (_, list) = send(&app, Method::GET, "/api/v1/teacher/routines", Some(&token), None).await;
    assert_eq!(list["routines"].as_array().unwrap().len(), 3);

    let uri = format!("/api/v1/teacher/routines/{id}");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_routine_rejects_oversized_ideal_time() {
    let app = app().await;
    let token = demo_teacher(&app).await;

    for minutes in [1441_i64, 600_000_000, 5_000_000_000] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/teacher/routines",
            Some(&token),
            Some(json!({
                "templateName": "Marathon",
                "sections": [{ "name": "Long tones", "idealDailyTimeMinutes": minutes }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"]["fields"][0]["field"],
            "sections.0.idealDailyTimeMinutes"
        );
    }

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/routines",
        Some(&token),
        Some(json!({
            "templateName": "Marathon",
            "sections": [{ "name": "Long tones", "idealDailyTimeMinutes": 1440 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["sections"][0]["idealDailyTimeMinutes"], 1440);
    assert_eq!(created["calculatedIdealWeeklyTime"], 11520);

    let (_, list) = send(&app, Method::GET, "/api/v1/teacher/routines", Some(&token), None).await;
    assert_eq!(list["routines"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_student_cannot_use_teacher_routes() {
    let app = app().await;
    let token = login(&app, "alice@example.com", "password").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/teacher/routines", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_add_student_rejects_duplicate_email() {
    let app = app().await;
    let token = demo_teacher(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/students",
        Some(&token),
        Some(json!({ "fullName": "Another Alice", "email": " ALICE@example.com " })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

/// 루틴 배정 → 학생 기록 제출 → 진도/차트/기록 목록 확인
#[tokio::test]
async fn test_practice_flow() {
    let app = app().await;
    let teacher = demo_teacher(&app).await;

    let (_, routine) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/routines",
        Some(&teacher),
        Some(json!({
            "templateName": "Daily Scales",
            "sections": [
                { "name": "Major", "idealDailyTimeMinutes": 15 },
                { "name": "Minor", "idealDailyTimeMinutes": 15 }
            ]
        })),
    )
    .await;
    let routine_id = routine["id"].as_str().unwrap().to_string();
    let section_id = routine["sections"][0]["id"].as_str().unwrap().to_string();

    let (status, student) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/students",
        Some(&teacher),
        Some(json!({ "fullName": "Eve Adams", "email": "Eve@Example.com", "initialPassword": "violin1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = student["id"].as_str().unwrap().to_string();

    let (status, assigned) = send(
        &app,
        Method::POST,
        &format!("/api/v1/teacher/students/{student_id}/assignment"),
        Some(&teacher),
        Some(json!({ "templateId": routine_id, "startDate": "2024-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["routinesAssigned"], 1);
    assert_eq!(assigned["currentRoutineIdealWeeklyTime"], 240);
    assert_eq!(assigned["currentRoutineProgressPercent"], 0);

    let student_token = login(&app, "eve@example.com", "violin1").await;

    // 빈 날: 템플릿 섹션이 0분으로 채워짐
    let (status, day) = send(
        &app,
        Method::GET,
        "/api/v1/student/practice?date=2024-01-01",
        Some(&student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["loggable"], true);
    assert_eq!(day["canNavigatePrev"], false);
    assert_eq!(day["entries"].as_array().unwrap().len(), 2);
    assert_eq!(day["entries"][0]["timeSpentMinutes"], 0);

    let submit = |date: &str, minutes: i64| {
        json!({
            "date": date,
            "logData": [{ "sectionId": section_id, "sectionName": "Major", "timeSpentMinutes": minutes }]
        })
    };

    let (status, saved) = send(
        &app,
        Method::POST,
        "/api/v1/student/practice",
        Some(&student_token),
        Some(submit("2024-01-02", 60)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["replaced"], false);
    assert_eq!(saved["progress"]["percent"], 25);

    // 같은 날 다시 제출하면 교체
    let (_, saved) = send(
        &app,
        Method::POST,
        "/api/v1/student/practice",
        Some(&student_token),
        Some(submit("2024-01-02", 120)),
    )
    .await;
    assert_eq!(saved["replaced"], true);
    assert_eq!(saved["progress"]["percent"], 50);

    send(
        &app,
        Method::POST,
        "/api/v1/student/practice",
        Some(&student_token),
        Some(submit("2024-01-08", 30)),
    )
    .await;

    // 기간 밖 날짜는 거부
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/student/practice",
        Some(&student_token),
        Some(submit("2024-01-09", 30)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Practice can only be logged between 2024-01-01 and 2024-01-08"
    );

    // 300분 초과는 검증 에러
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/student/practice",
        Some(&student_token),
        Some(submit("2024-01-03", 301)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, logs) = send(&app, Method::GET, "/api/v1/student/practice/logs", Some(&student_token), None).await;
    let logs = logs["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["date"], "2024-01-08");
    assert_eq!(logs[1]["date"], "2024-01-02");

    let (_, chart) = send(&app, Method::GET, "/api/v1/student/practice/chart", Some(&student_token), None).await;
    assert_eq!(chart["idealDailyPractice"], 30);
    let points = chart["chart"].as_array().unwrap();
    assert_eq!(points.len(), 8);
    assert_eq!(points[1]["actualPractice"], 120);
    assert_eq!(points[7]["actualPractice"], 30);
    assert_eq!(chart["progressPercent"], 63);

    // 선생님 상세 화면: 기록은 오름차순
    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/api/v1/teacher/students/{student_id}"),
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["student"]["currentRoutineProgressPercent"], 63);
    assert_eq!(detail["practice"]["logs"][0]["date"], "2024-01-02");

    // 템플릿을 지워도 기록은 남습니다
    send(
        &app,
        Method::DELETE,
        &format!("/api/v1/teacher/routines/{routine_id}"),
        Some(&teacher),
        None,
    )
    .await;
    let (_, logs) = send(&app, Method::GET, "/api/v1/student/practice/logs", Some(&student_token), None).await;
    assert_eq!(logs["logs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_navigation_stays_inside_window() {
    let app = app().await;
    let teacher = demo_teacher(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/students/1/assignment",
        Some(&teacher),
        Some(json!({ "templateId": "rt1", "startDate": "2024-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let student = login(&app, "alice@example.com", "password").await;

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/student/practice/navigate?from=2024-03-01&direction=prev",
        Some(&student),
        None,
    )
    .await;
    assert_eq!(body["date"], "2024-03-01");
    assert_eq!(body["moved"], false);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/student/practice/navigate?from=2024-03-07&direction=next",
        Some(&student),
        None,
    )
    .await;
    assert_eq!(body["date"], "2024-03-08");
    assert_eq!(body["canNavigateNext"], false);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/student/practice/navigate?from=2024-03-08&direction=next",
        Some(&student),
        None,
    )
    .await;
    assert_eq!(body["date"], "2024-03-08");
}

#[tokio::test]
async fn test_default_dates_use_local_day() {
    let app = app().await;
    let teacher = demo_teacher(&app).await;

    let (status, assigned) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/students/2/assignment",
        Some(&teacher),
        Some(json!({ "templateId": "rt1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(assigned["currentRoutineAssignmentDate"], today.as_str());

    let student = login(&app, "bob@example.com", "password").await;
    let (status, day) = send(&app, Method::GET, "/api/v1/student/practice", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["date"], today.as_str());
    assert_eq!(day["loggable"], true);
    assert_eq!(day["window"]["start"], today.as_str());
}

#[tokio::test]
async fn test_unknown_template_assignment_is_not_found() {
    let app = app().await;
    let teacher = demo_teacher(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/students/1/assignment",
        Some(&teacher),
        Some(json!({ "templateId": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/teacher/students/ghost/assignment",
        Some(&teacher),
        Some(json!({ "templateId": "rt1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_teacher_profile_requires_resume() {
    let app = app().await;
    let teacher = demo_teacher(&app).await;
    let student = login(&app, "bob@example.com", "password").await;

    let (status, _) = send(&app, Method::GET, "/api/v1/student/teacher-profile", Some(&student), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/teacher/resume",
        Some(&teacher),
        Some(json!({ "instrumentsTaught": "", "musicGenres": "Jazz", "yearsTeaching": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/v1/teacher/resume",
        Some(&teacher),
        Some(json!({
            "shortBio": "Pianist and educator",
            "instrumentsTaught": "Piano, Organ ,",
            "musicGenres": "Classical, Jazz",
            "yearsTeaching": 12
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/v1/student/teacher-profile", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["teacherName"], "Demo Teacher");
    assert_eq!(body["instruments"], json!(["Piano", "Organ"]));
    assert_eq!(body["resume"]["yearsTeaching"], 12);
}

#[tokio::test]
async fn test_account_settings() {
    let app = app().await;
    let teacher = demo_teacher(&app).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/password",
        Some(&teacher),
        Some(json!({ "newPassword": "newpass1", "confirmPassword": "newpass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let student = login(&app, "diana@example.com", "password").await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/password",
        Some(&student),
        Some(json!({ "currentPassword": "wrong", "newPassword": "lasso99", "confirmPassword": "lasso99" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/password",
        Some(&student),
        Some(json!({ "currentPassword": "password", "newPassword": "lasso99", "confirmPassword": "lasso99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/v1/settings/display-name",
        Some(&student),
        Some(json!({ "displayName": "Diana of Themyscira" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "Diana of Themyscira");

    let student = login(&app, "diana@example.com", "lasso99").await;
    let (_, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&student), None).await;
    assert_eq!(me["displayName"], "Diana of Themyscira");
}

#[tokio::test]
async fn test_preferences() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/preferences", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "theme": "system", "language": "en", "dir": "ltr" }));

    let (_, body) = send(
        &app,
        Method::PUT,
        "/api/v1/preferences",
        None,
        Some(json!({ "language": "fa" })),
    )
    .await;
    assert_eq!(body, json!({ "theme": "system", "language": "fa", "dir": "rtl" }));
}
