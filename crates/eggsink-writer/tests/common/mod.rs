//! 통합 테스트 공용 헬퍼.
//!
//! mockito 서버를 싱크로 쓰고, 이미 등록된 메트릭 그룹을 흉내 낸다.

#![allow(dead_code)]

use eggsink_core::config::WriterSettings;
use eggsink_core::models::catalog::Catalog;
use eggsink_writer::CopperEggWriter;
use mockito::{Matcher, Mock, ServerGuard};
use tracing_subscriber::EnvFilter;

/// 싱크 API 기본 경로
pub const BASE_PATH: &str = "/v2/revealmetrics";

/// base64("abc:U")
pub const AUTH: &str = "Basic YWJjOlU=";

/// 테스트 PID
pub const PID: u32 = 42;

/// `RUST_LOG`가 있으면 로그 출력
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn settings(server: &ServerGuard) -> WriterSettings {
    let mut settings = WriterSettings::with_credentials("user", "abc");
    settings.url = format!("{}{BASE_PATH}", server.url());
    settings.source = "h".to_string();
    settings
}

/// 그룹 정의 본문 (카탈로그가 재직렬화한 형태와 같다)
pub fn group_body(name: &str) -> String {
    serde_json::json!({ "name": name, "frequency": 60 }).to_string()
}

pub fn catalog(groups: &[&str]) -> Catalog {
    let mut catalog = Catalog::empty();
    for name in groups {
        catalog.metric_groups.insert(name.to_string(), group_body(name));
    }
    catalog
}

/// `GET /metric_groups.json?show_hidden=1`: `(id, name)` 목록 응답
pub async fn mock_group_index(server: &mut ServerGuard, remote: &[(&str, &str)]) -> Mock {
    let items: Vec<serde_json::Value> = remote
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();
    server
        .mock("GET", format!("{BASE_PATH}/metric_groups.json").as_str())
        .match_query(Matcher::UrlEncoded("show_hidden".into(), "1".into()))
        .match_header("authorization", AUTH)
        .with_status(200)
        .with_body(serde_json::Value::Array(items).to_string())
        .create_async()
        .await
}

/// `PUT /metric_groups/<id>.json?show_hidden=1`
pub async fn mock_group_put(server: &mut ServerGuard, id: &str, name: &str) -> Mock {
    server
        .mock("PUT", format!("{BASE_PATH}/metric_groups/{id}.json").as_str())
        .match_query(Matcher::UrlEncoded("show_hidden".into(), "1".into()))
        .match_header("content-type", "application/json; charset=utf-8")
        .match_body(Matcher::JsonString(group_body(name)))
        .with_status(200)
        .with_body(serde_json::json!({ "id": id }).to_string())
        .create_async()
        .await
}

/// `POST /samples/<group>.json`: 본문이 정확히 `expected`인 업로드 1건
pub async fn mock_upload(server: &mut ServerGuard, group: &str, expected: &str) -> Mock {
    server
        .mock("POST", format!("{BASE_PATH}/samples/{group}.json").as_str())
        .match_header("authorization", AUTH)
        .match_header("content-type", "application/json; charset=utf-8")
        .match_body(Matcher::JsonString(expected.to_string()))
        .with_status(200)
        .expect(1)
        .create_async()
        .await
}

/// 이름 그대로를 ID로 가진 그룹들이 이미 등록된 싱크에 대해 시작한 Writer
pub async fn started_writer(server: &mut ServerGuard, groups: &[&str]) -> CopperEggWriter {
    let remote: Vec<(&str, &str)> = groups.iter().map(|g| (*g, *g)).collect();
    let mut mocks = vec![mock_group_index(server, &remote).await];
    for group in groups {
        mocks.push(mock_group_put(server, group, group).await);
    }

    let writer = CopperEggWriter::new(settings(server))
        .with_catalog(catalog(groups))
        .with_pid(PID);
    writer.start().await.unwrap();

    for mock in mocks {
        mock.assert_async().await;
    }
    assert_eq!(writer.exception_count(), 0);
    writer
}
