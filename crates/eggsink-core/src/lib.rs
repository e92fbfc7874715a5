//! # eggsink-core
//!
//! EGGSINK 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 샘플/레코드/카탈로그/그룹 ID 테이블 (serde)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror) + 예외 카운터
//! - [`config`]: Writer 설정 구조체 (`config` crate 로드)

pub mod config;
pub mod error;
pub mod models;
pub mod ports;
