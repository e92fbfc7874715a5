//! 호스트 샘플 모델.
//!
//! 메트릭 수집 프레임워크가 한 번의 쿼리 결과로 넘겨주는 원본 샘플.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 호스트가 수집한 원본 샘플
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// 수집 시각 (Unix epoch 밀리초)
    pub epoch_ms: i64,
    /// dotted 메트릭 이름 (예: "jvm.os.OpenFileDescriptorCount")
    pub type_name: String,
    /// 값 맵: 보통 항목 하나
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
    /// MBean 클래스 별칭 (동적 패밀리 메트릭 키 접두사)
    #[serde(default)]
    pub class_name_alias: String,
}

impl RawSample {
    /// 단일 값 샘플 생성
    pub fn new(epoch_ms: i64, type_name: &str, key: &str, value: serde_json::Value) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value);
        Self {
            epoch_ms,
            type_name: type_name.to_string(),
            values,
            class_name_alias: String::new(),
        }
    }

    /// 클래스 별칭 지정
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.class_name_alias = alias.to_string();
        self
    }

    /// 초 단위로 절삭한 타임스탬프
    pub fn timestamp_s(&self) -> i64 {
        self.epoch_ms / 1000
    }

    /// 값 맵의 `{k=v, ...}` 문자열 표현
    ///
    /// 호스트가 요약한 형태와 같다. 문자열 값은 따옴표 없이 그대로 쓴다.
    pub fn summary_string(&self) -> String {
        let body = self
            .values
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{k}={s}"),
                other => format!("{k}={other}"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{body}}}")
    }
}
