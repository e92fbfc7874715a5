//! 카탈로그 로더.
//!
//! 기본은 crate에 내장된 `copperegg_config.json`. `catalog_path`가 있으면 그 파일을 읽고,
//! 파일이 없으면 내장 카탈로그로 되돌아간다. 파싱 실패는 빈 카탈로그가 된다.

use eggsink_core::error::{CoreError, ErrorCounter};
use eggsink_core::models::catalog::Catalog;
use std::path::Path;
use tracing::{debug, info};

/// 내장 카탈로그 원문
pub const BUNDLED_CATALOG: &str = include_str!("../resources/copperegg_config.json");

/// 카탈로그 로드: 실패는 `errors`에 기록하고 삼킨다
pub fn load_catalog(path: Option<&Path>, errors: &ErrorCounter) -> Catalog {
    let raw = match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(raw) => {
                debug!("카탈로그 파일 사용: {}", path.display());
                raw
            }
            Err(e) => {
                errors.record(
                    &format!("카탈로그 파일 읽기 실패 ({}): 내장 카탈로그 사용", path.display()),
                    &CoreError::Io(e),
                );
                BUNDLED_CATALOG.to_string()
            }
        },
        None => BUNDLED_CATALOG.to_string(),
    };

    match Catalog::from_json_str(&raw) {
        Ok(catalog) => {
            info!(
                "카탈로그 로드: 메트릭 그룹 {}개, 대시보드 {}개",
                catalog.metric_groups.len(),
                catalog.dashboards.len()
            );
            catalog
        }
        Err(e) => {
            errors.record("카탈로그 파싱 실패: 빈 카탈로그로 진행", &e);
            Catalog::empty()
        }
    }
}
