//! 로컬 카탈로그 모델.
//!
//! 메트릭 그룹/대시보드 정의를 이름 → JSON 본문으로 보관한다.
//! 본문은 불투명하게 다루며 `name` 필드만 검사한다.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::CoreError;

/// 파일 최상위 형태: `{ "config": { "metric_groups": [...], "dashboards": [...] } }`
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    config: CatalogSections,
}

#[derive(Debug, Deserialize)]
struct CatalogSections {
    metric_groups: Vec<serde_json::Value>,
    dashboards: Vec<serde_json::Value>,
}

/// 로컬 카탈로그: 이름 → 재직렬화된 JSON 본문
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub metric_groups: BTreeMap<String, String>,
    pub dashboards: BTreeMap<String, String>,
}

impl Catalog {
    /// 빈 카탈로그 (동기화는 no-op)
    pub fn empty() -> Self {
        Self::default()
    }

    /// 카탈로그 JSON 파싱
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        let doc: CatalogDocument = serde_json::from_str(raw)
            .map_err(|e| CoreError::CatalogParse(format!("카탈로그 JSON 오류: {e}")))?;

        Ok(Self {
            metric_groups: index_by_name("metric_groups", doc.config.metric_groups)?,
            dashboards: index_by_name("dashboards", doc.config.dashboards)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.metric_groups.is_empty() && self.dashboards.is_empty()
    }
}

/// 항목마다 `name`을 꺼내고 본문을 compact JSON으로 재직렬화
fn index_by_name(
    section: &str,
    entries: Vec<serde_json::Value>,
) -> Result<BTreeMap<String, String>, CoreError> {
    let mut map = BTreeMap::new();
    for (idx, entry) in entries.into_iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| {
                CoreError::CatalogParse(format!("{section}[{idx}]: 문자열 name 필드 없음"))
            })?
            .to_string();
        let body = serde_json::to_string(&entry)?;
        map.insert(name, body);
    }
    Ok(map)
}
