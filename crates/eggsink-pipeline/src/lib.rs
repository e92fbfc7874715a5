//! # eggsink-pipeline
//!
//! 호스트 샘플 → 업로드 배치 변환 파이프라인.
//! 네트워크와 무관한 순수 로직만 담는다.
//!
//! - [`routes`]: dotted 이름 라우팅 표 (데이터 기반 디스패치)
//! - [`value`]: 값 파싱 및 단위 변환
//! - [`classifier`]: 샘플 하나 → 레코드 하나 또는 버림
//! - [`batcher`]: (초, source_id) 정렬 및 구간 분할

pub mod batcher;
pub mod classifier;
pub mod routes;
pub mod value;

pub use batcher::{into_batches, partition_by_group};
pub use classifier::Classifier;
