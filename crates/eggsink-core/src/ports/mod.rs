//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! `eggsink-network`가 싱크 포트를 구현하고, 호스트가 결과 포트를 구현하며,
//! `eggsink-writer`에서 `Arc<dyn T>`로 와이어링한다.

pub mod host;
pub mod sink_client;
