//! # 서비스(비즈니스 로직) 모듈
//!
//! 라우트 핸들러와 저장소 사이의 로직을 담습니다.
//! - `progress`: 과제 기간, 진도율, 차트 데이터 계산 (순수 함수)
//! - `session`: 메모리 세션 저장소와 선생님 자격 증명
//! - `seed`: 데모 데이터

pub mod progress;
pub mod seed;
pub mod session;
