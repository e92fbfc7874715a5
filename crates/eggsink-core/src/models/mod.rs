//! EGGSINK 도메인 모델.
//!
//! 호스트 샘플, 분류 결과, 업로드 배치, 카탈로그, 그룹 ID 테이블을 정의한다.

pub mod catalog;
pub mod group;
pub mod record;
pub mod sample;
