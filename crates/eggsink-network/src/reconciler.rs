//! 카탈로그 동기화기.
//!
//! 로컬 카탈로그의 메트릭 그룹/대시보드를 싱크에 upsert 하고 이름 → ID 테이블을 만든다.
//! 같은 원격 상태에 두 번 적용해도 결과가 같다 (두 번째는 동일 본문 PUT).

use eggsink_core::error::{CoreError, ErrorCounter};
use eggsink_core::models::catalog::Catalog;
use eggsink_core::models::group::ReconciledIds;
use eggsink_core::ports::sink_client::{SinkClient, SinkResponse};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 동기화 대상 컬렉션
///
/// 두 컬렉션은 엔드포인트와 ID 타입만 다르다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    MetricGroups,
    Dashboards,
}

impl CatalogKind {
    pub fn collection(&self) -> &'static str {
        match self {
            CatalogKind::MetricGroups => "metric_groups",
            CatalogKind::Dashboards => "dashboards",
        }
    }

    /// 원격 목록 조회 경로
    pub fn index_path(&self) -> &'static str {
        match self {
            CatalogKind::MetricGroups => "/metric_groups.json?show_hidden=1",
            CatalogKind::Dashboards => "/dashboards.json",
        }
    }

    /// 신규 생성 경로
    pub fn create_path(&self) -> &'static str {
        match self {
            CatalogKind::MetricGroups => "/metric_groups.json",
            CatalogKind::Dashboards => "/dashboards.json",
        }
    }

    /// 기존 항목 갱신 경로
    pub fn update_path(&self, id: &str) -> String {
        match self {
            CatalogKind::MetricGroups => format!("/metric_groups/{id}.json?show_hidden=1"),
            CatalogKind::Dashboards => format!("/dashboards/{id}.json"),
        }
    }

    /// 대시보드 ID는 숫자, 메트릭 그룹 ID는 문자열
    pub fn expect_int_id(&self) -> bool {
        matches!(self, CatalogKind::Dashboards)
    }
}

/// 카탈로그 동기화기
pub struct CatalogReconciler {
    client: Arc<dyn SinkClient>,
    errors: ErrorCounter,
}

impl CatalogReconciler {
    /// 새 동기화기 생성: 실패는 `errors`에 기록된다
    pub fn new(client: Arc<dyn SinkClient>, errors: ErrorCounter) -> Self {
        Self { client, errors }
    }

    /// 메트릭 그룹 → 대시보드 순으로 동기화하고 ID 테이블 생성
    pub async fn sync_catalog(&self, catalog: &Catalog, dynamic_group: Option<&str>) -> ReconciledIds {
        let mut ids = ReconciledIds::new(dynamic_group);

        let groups = self
            .reconcile(CatalogKind::MetricGroups, &catalog.metric_groups)
            .await;
        for (name, id) in &groups {
            ids.record_metric_group(name, id);
        }

        let dashboards = self
            .reconcile(CatalogKind::Dashboards, &catalog.dashboards)
            .await;
        for (name, id) in &dashboards {
            ids.record_dashboard(name, id);
        }

        info!(
            "카탈로그 동기화 완료: 메트릭 그룹 {}개, 대시보드 {}개, 동적 그룹 {:?}",
            ids.metric_groups().len(),
            ids.dashboards().len(),
            ids.dynamic_group()
        );
        ids
    }

    /// 컬렉션 하나 동기화: 성공한 항목의 이름 → ID
    ///
    /// 항목은 순차 처리한다. 실패한 항목은 기록 후 건너뛴다.
    /// 원격 목록 조회가 실패하면 한 번만 기록하고 컬렉션 전체를 건너뛴다.
    pub async fn reconcile(
        &self,
        kind: CatalogKind,
        entries: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut resolved = BTreeMap::new();
        if entries.is_empty() {
            debug!("{} 로컬 항목 없음: 동기화 생략", kind.collection());
            return resolved;
        }

        let remote = match self.fetch_index(kind).await {
            Ok(remote) => remote,
            Err(e) => {
                self.errors.record("원격 목록 조회 실패", &e);
                return resolved;
            }
        };

        for (name, body) in entries {
            match self.upsert(kind, &remote, name, body).await {
                Ok(id) => {
                    debug!("{} 동기화: {name} → {id}", kind.collection());
                    resolved.insert(name.clone(), id);
                }
                Err(e) => self.errors.record("카탈로그 항목 동기화 실패", &e),
            }
        }
        resolved
    }

    /// 원격 목록 → 이름 → ID
    async fn fetch_index(&self, kind: CatalogKind) -> Result<BTreeMap<String, String>, CoreError> {
        let fail = |message: String| CoreError::Reconcile {
            name: kind.collection().to_string(),
            message,
        };

        let resp = self
            .client
            .get(kind.index_path())
            .await
            .map_err(|e| fail(e.to_string()))?;
        let resp = require_ok(resp).map_err(fail)?;
        parse_index(kind, &resp.body).map_err(fail)
    }

    async fn upsert(
        &self,
        kind: CatalogKind,
        remote: &BTreeMap<String, String>,
        name: &str,
        body: &str,
    ) -> Result<String, CoreError> {
        let fail = |message: String| CoreError::Reconcile {
            name: name.to_string(),
            message,
        };

        let resp = match remote.get(name) {
            Some(id) => self.client.put(&kind.update_path(id), body.to_string()).await,
            None => self.client.post(kind.create_path(), body.to_string()).await,
        }
        .map_err(|e| fail(e.to_string()))?;

        let resp = require_ok(resp).map_err(fail)?;
        let value: Value = serde_json::from_str(&resp.body)
            .map_err(|e| fail(format!("응답 JSON 오류: {e}")))?;
        extract_id(&value, kind.expect_int_id()).map_err(fail)
    }
}

fn require_ok(resp: SinkResponse) -> Result<SinkResponse, String> {
    if resp.is_ok() {
        Ok(resp)
    } else {
        Err(format!("HTTP {}: {}", resp.status, resp.body))
    }
}

/// 원격 목록 JSON 파싱: `[{"id": .., "name": ..}, ...]`
///
/// `name`이나 `id`가 없는 원소는 무시한다.
pub fn parse_index(kind: CatalogKind, body: &str) -> Result<BTreeMap<String, String>, String> {
    let items: Vec<Value> =
        serde_json::from_str(body).map_err(|e| format!("목록 JSON 오류: {e}"))?;

    let mut remote = BTreeMap::new();
    for item in &items {
        let Some(name) = item.get("name").and_then(Value::as_str) else {
            continue;
        };
        match extract_id(item, kind.expect_int_id()) {
            // 같은 이름이 여러 번 나오면 첫 항목
            Ok(id) => {
                remote.entry(name.to_string()).or_insert(id);
            }
            Err(e) => debug!("목록 항목 무시 ({name}): {e}"),
        }
    }
    Ok(remote)
}

/// `id` 필드 추출: `expect_int`이면 정수, 아니면 문자열
fn extract_id(value: &Value, expect_int: bool) -> Result<String, String> {
    let id = value.get("id").ok_or_else(|| "id 필드 없음".to_string())?;
    if expect_int {
        id.as_i64()
            .map(|n| n.to_string())
            .ok_or_else(|| format!("정수 id 아님: {id}"))
    } else {
        id.as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("문자열 id 아님: {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use eggsink_core::ports::sink_client::SinkMethod;
    use std::sync::Mutex;

    /// 메모리 내 싱크: 메트릭 그룹 ID는 이름 그대로, 대시보드 ID는 일련번호
    #[derive(Default)]
    struct FakeSink {
        state: Mutex<FakeState>,
    }

    #[derive(Default)]
    struct FakeState {
        groups: BTreeMap<String, String>,
        dashboards: BTreeMap<i64, (String, String)>,
        next_dashboard: i64,
        calls: Vec<(SinkMethod, String)>,
        index_status: Option<u16>,
        unreachable: Vec<String>,
    }

    impl FakeSink {
        fn with_groups(names: &[(&str, &str)]) -> Self {
            let sink = Self::default();
            {
                let mut state = sink.state.lock().unwrap();
                for (id, name) in names {
                    state.groups.insert(id.to_string(), name.to_string());
                }
            }
            sink
        }

        fn calls(&self) -> Vec<(SinkMethod, String)> {
            self.state.lock().unwrap().calls.clone()
        }

        fn ok(body: String) -> Result<SinkResponse, CoreError> {
            Ok(SinkResponse { status: 200, body })
        }
    }

    fn body_name(body: &Option<String>) -> String {
        let value: Value = serde_json::from_str(body.as_deref().unwrap_or("{}")).unwrap();
        value["name"].as_str().unwrap_or_default().to_string()
    }

    #[async_trait]
    impl SinkClient for FakeSink {
        async fn request(
            &self,
            method: SinkMethod,
            path: &str,
            body: Option<String>,
        ) -> Result<SinkResponse, CoreError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push((method, path.to_string()));

            let name = body_name(&body);
            if state.unreachable.contains(&name) {
                return Err(CoreError::Network("connection reset".to_string()));
            }

            match (method, path) {
                (SinkMethod::Get, p) if p.starts_with("/metric_groups.json") => {
                    if let Some(status) = state.index_status {
                        return Ok(SinkResponse { status, body: "boom".to_string() });
                    }
                    let items: Vec<Value> = state
                        .groups
                        .iter()
                        .map(|(id, name)| serde_json::json!({"id": id, "name": name}))
                        .collect();
                    Self::ok(Value::Array(items).to_string())
                }
                (SinkMethod::Get, "/dashboards.json") => {
                    let items: Vec<Value> = state
                        .dashboards
                        .iter()
                        .map(|(id, (name, _))| serde_json::json!({"id": id, "name": name}))
                        .collect();
                    Self::ok(Value::Array(items).to_string())
                }
                (SinkMethod::Post, "/metric_groups.json") => {
                    state.groups.insert(name.clone(), name.clone());
                    Self::ok(serde_json::json!({"id": name}).to_string())
                }
                (SinkMethod::Put, p) if p.starts_with("/metric_groups/") => {
                    let id = p
                        .trim_start_matches("/metric_groups/")
                        .trim_end_matches(".json?show_hidden=1")
                        .to_string();
                    state.groups.insert(id.clone(), name);
                    Self::ok(serde_json::json!({"id": id}).to_string())
                }
                (SinkMethod::Post, "/dashboards.json") => {
                    state.next_dashboard += 1;
                    let id = state.next_dashboard;
                    state.dashboards.insert(id, (name, body.unwrap_or_default()));
                    Self::ok(serde_json::json!({"id": id}).to_string())
                }
                (SinkMethod::Put, p) if p.starts_with("/dashboards/") => {
                    let id: i64 = p
                        .trim_start_matches("/dashboards/")
                        .trim_end_matches(".json")
                        .parse()
                        .unwrap();
                    state.dashboards.insert(id, (name, body.unwrap_or_default()));
                    Self::ok(serde_json::json!({"id": id}).to_string())
                }
                _ => Ok(SinkResponse { status: 404, body: String::new() }),
            }
        }
    }

    fn entries(names: &[&str]) -> BTreeMap<String, String> {
        names
            .iter()
            .map(|n| (n.to_string(), serde_json::json!({"name": n}).to_string()))
            .collect()
    }

    fn reconciler(sink: &Arc<FakeSink>) -> (CatalogReconciler, ErrorCounter) {
        let errors = ErrorCounter::new();
        let client: Arc<dyn SinkClient> = sink.clone();
        (CatalogReconciler::new(client, errors.clone()), errors)
    }

    #[test]
    fn kind_paths() {
        assert_eq!(
            CatalogKind::MetricGroups.update_path("g1"),
            "/metric_groups/g1.json?show_hidden=1"
        );
        assert_eq!(CatalogKind::Dashboards.update_path("7"), "/dashboards/7.json");
        assert!(CatalogKind::Dashboards.expect_int_id());
        assert!(!CatalogKind::MetricGroups.expect_int_id());
    }

    #[test]
    fn index_parsing_by_id_type() {
        let groups = parse_index(
            CatalogKind::MetricGroups,
            r#"[{"id":"g1","name":"jvm_os"},{"name":"no_id"},{"id":"x"}]"#,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["jvm_os"], "g1");

        let dashboards =
            parse_index(CatalogKind::Dashboards, r#"[{"id":12,"name":"JVM"}]"#).unwrap();
        assert_eq!(dashboards["JVM"], "12");

        assert!(parse_index(CatalogKind::Dashboards, r#"{"id":1}"#).is_err());
    }

    #[test]
    fn duplicate_remote_name_keeps_first_id() {
        let groups = parse_index(
            CatalogKind::MetricGroups,
            r#"[{"id":"g1","name":"heap"},{"id":"g2","name":"heap"}]"#,
        )
        .unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["heap"], "g1");
    }

    #[tokio::test]
    async fn existing_group_is_put_and_new_group_is_posted() {
        let sink = Arc::new(FakeSink::with_groups(&[("g1", "jvm_os")]));
        let (reconciler, errors) = reconciler(&sink);

        let ids = reconciler
            .reconcile(CatalogKind::MetricGroups, &entries(&["jvm_os", "heap"]))
            .await;

        let calls = sink.calls();
        assert!(calls.contains(&(SinkMethod::Put, "/metric_groups/g1.json?show_hidden=1".into())));
        assert!(calls.contains(&(SinkMethod::Post, "/metric_groups.json".into())));
        assert_eq!(calls.len(), 3);
        assert_eq!(ids["jvm_os"], "g1");
        assert_eq!(ids["heap"], "heap");
        assert_eq!(errors.get(), 0);
    }

    #[tokio::test]
    async fn reconciliation_is_idempotent() {
        let sink = Arc::new(FakeSink::default());
        let (reconciler, errors) = reconciler(&sink);
        let mut catalog = Catalog::empty();
        catalog.metric_groups = entries(&["jvm_os", "heap"]);
        catalog.dashboards = entries(&["JVM Overview"]);

        let first = reconciler.sync_catalog(&catalog, Some("jeff_test2")).await;
        let dashboards_after_first = sink.state.lock().unwrap().dashboards.clone();
        let calls_after_first = sink.calls().len();

        let second = reconciler.sync_catalog(&catalog, Some("jeff_test2")).await;

        assert_eq!(first, second);
        assert_eq!(sink.state.lock().unwrap().dashboards, dashboards_after_first);
        // 두 번째 패스는 전부 PUT
        let second_pass: Vec<_> = sink.calls().into_iter().skip(calls_after_first).collect();
        assert!(second_pass
            .iter()
            .all(|(method, _)| matches!(method, SinkMethod::Get | SinkMethod::Put)));
        assert_eq!(first.dashboard_id("JVM Overview"), Some("1"));
        assert_eq!(errors.get(), 0);
    }

    #[tokio::test]
    async fn cassandra_group_takes_over_dynamic_family() {
        let sink = Arc::new(FakeSink::default());
        let (reconciler, _) = reconciler(&sink);
        let mut catalog = Catalog::empty();
        catalog.metric_groups = entries(&["jvm_os", "cassandra_metrics"]);

        let ids = reconciler.sync_catalog(&catalog, Some("jeff_test2")).await;
        assert_eq!(ids.dynamic_group(), Some("cassandra_metrics"));
    }

    #[tokio::test]
    async fn index_failure_counts_once_and_skips_collection() {
        let sink = Arc::new(FakeSink::default());
        sink.state.lock().unwrap().index_status = Some(500);
        let (reconciler, errors) = reconciler(&sink);

        let ids = reconciler
            .reconcile(CatalogKind::MetricGroups, &entries(&["jvm_os", "heap"]))
            .await;

        assert!(ids.is_empty());
        assert_eq!(errors.get(), 1);
        assert_eq!(sink.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_entry_is_skipped_and_rest_continue() {
        let sink = Arc::new(FakeSink::default());
        sink.state.lock().unwrap().unreachable.push("heap".to_string());
        let (reconciler, errors) = reconciler(&sink);

        let ids = reconciler
            .reconcile(CatalogKind::MetricGroups, &entries(&["heap", "jvm_os", "nonheap"]))
            .await;

        assert_eq!(errors.get(), 1);
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains_key("heap"));
    }

    #[test]
    fn empty_catalog_makes_no_calls() {
        let sink = Arc::new(FakeSink::default());
        let (reconciler, errors) = reconciler(&sink);

        let ids = tokio_test::block_on(reconciler.sync_catalog(&Catalog::empty(), None));

        assert!(ids.metric_groups().is_empty());
        assert!(sink.calls().is_empty());
        assert_eq!(errors.get(), 0);
    }
}
