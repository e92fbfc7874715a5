//! 분류 결과 및 업로드 배치 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 숫자 메트릭 값
///
/// 정수는 JSON 정수로, 실수는 JSON 실수(`2.0`)로 직렬화된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    /// f64로 변환 (단위 변환용)
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Int(v) => *v as f64,
            MetricValue::Float(v) => *v,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// 분류기를 통과한 단일 레코드
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    /// 업로드 대상 메트릭 그룹 (`/samples/<group_key>.json`)
    pub group_key: String,
    /// 출처 식별자 (`<source>.<pid>[.<suffix>...]`)
    pub source_id: String,
    /// 업로드 문서의 values 키
    pub metric_key: String,
    pub value: MetricValue,
    /// 초 단위 타임스탬프 (`epoch_ms / 1000`)
    pub timestamp_s: i64,
}

/// 업로드 문서 한 건: 같은 (초, source_id)를 공유하는 레코드 묶음
///
/// 직렬화 결과가 곧 `/samples/<group>.json` POST 본문이다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleBatch {
    /// 배치의 source_id
    pub identifier: String,
    /// 배치의 초 단위 타임스탬프
    pub timestamp: i64,
    /// metric_key → 값
    pub values: BTreeMap<String, MetricValue>,
}

impl SampleBatch {
    /// 빈 배치 생성
    pub fn new(identifier: &str, timestamp: i64) -> Self {
        Self {
            identifier: identifier.to_string(),
            timestamp,
            values: BTreeMap::new(),
        }
    }

    /// 레코드 값 추가 (같은 키는 나중 값이 이긴다)
    pub fn push(&mut self, record: &ClassifiedRecord) {
        self.values.insert(record.metric_key.clone(), record.value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
