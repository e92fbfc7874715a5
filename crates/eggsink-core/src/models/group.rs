//! 메트릭 패밀리와 동기화된 그룹 ID 테이블.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 분류기가 라우팅하는 논리 메트릭 패밀리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    Jmxtrans,
    JvmOs,
    JvmRuntime,
    JvmClass,
    JvmThread,
    JvmGc,
    Nonheap,
    Heap,
    TomcatThreadPool,
    TomcatGrp,
    TomcatManager,
    TomcatServlet,
    TomcatDb,
    App,
    AppSales,
    /// 라우팅 표에 없는 접두사: 그룹 ID는 설정/동기화로 결정
    Dynamic,
}

impl MetricFamily {
    /// 카탈로그에 선언된 고정 패밀리 전체
    pub const STATIC: [MetricFamily; 15] = [
        MetricFamily::Jmxtrans,
        MetricFamily::JvmOs,
        MetricFamily::JvmRuntime,
        MetricFamily::JvmClass,
        MetricFamily::JvmThread,
        MetricFamily::JvmGc,
        MetricFamily::Nonheap,
        MetricFamily::Heap,
        MetricFamily::TomcatThreadPool,
        MetricFamily::TomcatGrp,
        MetricFamily::TomcatManager,
        MetricFamily::TomcatServlet,
        MetricFamily::TomcatDb,
        MetricFamily::App,
        MetricFamily::AppSales,
    ];

    /// 카탈로그의 메트릭 그룹 이름. 동적 패밀리는 고정 이름이 없다.
    pub fn group_name(&self) -> Option<&'static str> {
        let name = match self {
            MetricFamily::Jmxtrans => "jmxtrans",
            MetricFamily::JvmOs => "jvm_os",
            MetricFamily::JvmRuntime => "jvm_runtime",
            MetricFamily::JvmClass => "jvm_class",
            MetricFamily::JvmThread => "jvm_thread",
            MetricFamily::JvmGc => "jvm_gc",
            MetricFamily::Nonheap => "nonheap",
            MetricFamily::Heap => "heap",
            MetricFamily::TomcatThreadPool => "tomcat_thread_pool",
            MetricFamily::TomcatGrp => "tomcat_grp",
            MetricFamily::TomcatManager => "tomcat_manager",
            MetricFamily::TomcatServlet => "tomcat_servlet",
            MetricFamily::TomcatDb => "tomcat_db",
            MetricFamily::App => "app",
            MetricFamily::AppSales => "app_sales",
            MetricFamily::Dynamic => return None,
        };
        Some(name)
    }
}

impl std::fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.group_name().unwrap_or("dynamic"))
    }
}

/// 동적 패밀리를 가로채는 원격 그룹 ID 표식
const DYNAMIC_TAKEOVER_MARKER: &str = "cassandra";

/// 동기화로 얻은 그룹 ID 테이블
///
/// `start`가 한 번 채워 게시하고 이후로는 읽기 전용이다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledIds {
    metric_groups: BTreeMap<String, String>,
    dashboards: BTreeMap<String, String>,
    dynamic_group: Option<String>,
}

impl ReconciledIds {
    /// 동적 패밀리 초기 그룹 ID로 생성
    pub fn new(dynamic_group: Option<&str>) -> Self {
        Self {
            metric_groups: BTreeMap::new(),
            dashboards: BTreeMap::new(),
            dynamic_group: dynamic_group.map(str::to_string),
        }
    }

    /// 메트릭 그룹 ID 기록
    ///
    /// ID에 "cassandra"가 들어 있으면 동적 패밀리 그룹도 그 ID로 바꾼다.
    pub fn record_metric_group(&mut self, name: &str, id: &str) {
        if id.to_lowercase().contains(DYNAMIC_TAKEOVER_MARKER) {
            self.dynamic_group = Some(id.to_string());
        }
        self.metric_groups.insert(name.to_string(), id.to_string());
    }

    /// 대시보드 ID 기록
    pub fn record_dashboard(&mut self, name: &str, id: &str) {
        self.dashboards.insert(name.to_string(), id.to_string());
    }

    pub fn metric_group_id(&self, name: &str) -> Option<&str> {
        self.metric_groups.get(name).map(String::as_str)
    }

    pub fn dashboard_id(&self, name: &str) -> Option<&str> {
        self.dashboards.get(name).map(String::as_str)
    }

    pub fn dynamic_group(&self) -> Option<&str> {
        self.dynamic_group.as_deref()
    }

    pub fn metric_groups(&self) -> &BTreeMap<String, String> {
        &self.metric_groups
    }

    pub fn dashboards(&self) -> &BTreeMap<String, String> {
        &self.dashboards
    }

    /// 패밀리의 업로드 대상 그룹. `None`이면 해당 패밀리는 버린다.
    pub fn upload_target(&self, family: MetricFamily) -> Option<&str> {
        match family.group_name() {
            Some(name) => self.metric_groups.get_key_value(name).map(|(k, _)| k.as_str()),
            None => self.dynamic_group(),
        }
    }
}
