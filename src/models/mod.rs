//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `routine`: 연습 루틴 템플릿과 섹션
//! - `student`: 학생 레코드와 학생 관리 요청
//! - `practice_log`: 일일 연습 기록
//! - `resume`: 선생님 이력서
//! - `user`: 세션 사용자, 로그인/회원가입, 계정 설정 요청
//! - `preferences`: 테마/언어 환경설정
//!
//! 저장소에 기록되는 구조체는 모두 camelCase JSON으로 직렬화됩니다.

pub mod practice_log;
pub mod preferences;
pub mod resume;
pub mod routine;
pub mod student;
pub mod user;

pub use practice_log::*;
pub use preferences::*;
pub use resume::*;
pub use routine::*;
pub use student::*;
pub use user::*;
