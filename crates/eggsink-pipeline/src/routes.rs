//! dotted 메트릭 이름 라우팅 표.
//!
//! 각 행은 (패턴, 패밀리, source_id 접미사, 메트릭 키 재작성, 값 변환) 튜플이다.
//! 위에서부터 첫 번째로 맞는 행이 이긴다.

use eggsink_core::models::group::MetricFamily;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;
const NANOS_PER_SEC: f64 = 1_000_000_000.0;
const MILLIS_PER_MINUTE: f64 = 60_000.0;
const GRP_PROCESSING_TIME_DIVISOR: f64 = 1024.0;

/// 이름 조각 하나에 대한 조건
#[derive(Debug, Clone, Copy)]
pub enum Segment {
    Any,
    Exact(&'static str),
    OneOf(&'static [&'static str]),
    NoneOf(&'static [&'static str]),
}

impl Segment {
    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::Any => true,
            Segment::Exact(expected) => part == *expected,
            Segment::OneOf(options) => options.contains(&part),
            Segment::NoneOf(options) => !options.contains(&part),
        }
    }
}

/// 업로드 문서에 쓰일 메트릭 키
#[derive(Debug, Clone, Copy)]
pub enum MetricKey {
    /// 원본 dotted 이름 그대로
    TypeName,
    /// 고정 키
    Fixed(&'static str),
    /// 지정한 조각들을 '.'으로 연결
    Join(&'static [usize]),
}

/// 값 변환
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Identity,
    /// 나눗셈 후 실수로 내보낸다
    Scale(f64),
}

/// 라우팅 표 한 행
#[derive(Debug)]
pub struct Route {
    pub family: MetricFamily,
    /// 앞에서부터 위치별로 맞춰 보는 조건. 이름 조각이 더 많아도 된다.
    pub pattern: &'static [Segment],
    /// `<source>.<pid>` 뒤에 붙일 조각 인덱스
    pub source_suffix: &'static [usize],
    pub metric_key: MetricKey,
    pub transform: Transform,
}

impl Route {
    pub fn matches(&self, parts: &[&str]) -> bool {
        parts.len() >= self.pattern.len()
            && self
                .pattern
                .iter()
                .zip(parts)
                .all(|(segment, part)| segment.matches(part))
    }

    pub fn source_id(&self, source_pid: &str, parts: &[&str]) -> String {
        let mut id = source_pid.to_string();
        for &idx in self.source_suffix {
            id.push('.');
            id.push_str(parts[idx]);
        }
        id
    }

    pub fn metric_key(&self, type_name: &str, parts: &[&str]) -> String {
        match self.metric_key {
            MetricKey::TypeName => type_name.to_string(),
            MetricKey::Fixed(key) => key.to_string(),
            MetricKey::Join(indices) => indices
                .iter()
                .map(|&idx| parts[idx])
                .collect::<Vec<_>>()
                .join("."),
        }
    }
}

const HEAP_POOLS: &[&str] = &["Eden_Space", "Survivor_Space", "Tenured_Gen"];
const NONHEAP_POOLS: &[&str] = &["Perm_Gen", "Code_Cache"];
const POOL_ATTRS: &[&str] = &["committed", "used"];

/// 라우팅 표
pub static ROUTES: &[Route] = &[
    Route {
        family: MetricFamily::Jmxtrans,
        pattern: &[Segment::Exact("jmxtrans")],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::JvmOs,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("os"),
            Segment::Exact("OpenFileDescriptorCount"),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::JvmOs,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("os"),
            Segment::Exact("CommittedVirtualMemorySize"),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Scale(BYTES_PER_MIB),
    },
    Route {
        family: MetricFamily::JvmOs,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("os"),
            Segment::Exact("ProcessCpuTime"),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Scale(NANOS_PER_SEC),
    },
    Route {
        family: MetricFamily::JvmRuntime,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("runtime"),
            Segment::Exact("Uptime"),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Scale(MILLIS_PER_MINUTE),
    },
    Route {
        family: MetricFamily::JvmClass,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("loadedClasses"),
            Segment::Exact("LoadedClassCount"),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::JvmThread,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("thread"),
            Segment::Exact("ThreadCount"),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::JvmGc,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("gc"),
            Segment::OneOf(&["Copy", "MarkSweepCompact"]),
            Segment::OneOf(&["CollectionCount", "CollectionTime"]),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::Nonheap,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("memorypool"),
            Segment::OneOf(NONHEAP_POOLS),
            Segment::Any,
            Segment::OneOf(POOL_ATTRS),
        ],
        source_suffix: &[2, 4],
        metric_key: MetricKey::Fixed("jvmNonHeapMemoryUsage"),
        transform: Transform::Scale(BYTES_PER_MIB),
    },
    Route {
        family: MetricFamily::Heap,
        pattern: &[
            Segment::Exact("jvm"),
            Segment::Exact("memorypool"),
            Segment::OneOf(HEAP_POOLS),
            Segment::Any,
            Segment::OneOf(POOL_ATTRS),
        ],
        source_suffix: &[2, 4],
        metric_key: MetricKey::Fixed("jvmHeapMemoryUsage"),
        transform: Transform::Scale(BYTES_PER_MIB),
    },
    Route {
        family: MetricFamily::TomcatThreadPool,
        pattern: &[
            Segment::Exact("tomcat"),
            Segment::Exact("thread-pool"),
            Segment::Any,
            Segment::OneOf(&["currentThreadsBusy", "currentThreadCount"]),
        ],
        source_suffix: &[2],
        metric_key: MetricKey::Join(&[0, 1, 3]),
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::TomcatGrp,
        pattern: &[
            Segment::Exact("tomcat"),
            Segment::Exact("global-request-processor"),
            Segment::Any,
            Segment::Exact("processingTime"),
        ],
        source_suffix: &[2],
        metric_key: MetricKey::Join(&[0, 1, 3]),
        transform: Transform::Scale(GRP_PROCESSING_TIME_DIVISOR),
    },
    Route {
        family: MetricFamily::TomcatGrp,
        pattern: &[
            Segment::Exact("tomcat"),
            Segment::Exact("global-request-processor"),
            Segment::Any,
            Segment::Any,
        ],
        source_suffix: &[2],
        metric_key: MetricKey::Join(&[0, 1, 3]),
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::TomcatManager,
        pattern: &[
            Segment::Exact("tomcat"),
            Segment::Exact("manager"),
            Segment::Any,
            Segment::Any,
            Segment::Exact("activeSessions"),
        ],
        source_suffix: &[2, 3],
        metric_key: MetricKey::Join(&[0, 1, 4]),
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::TomcatServlet,
        pattern: &[
            Segment::Exact("tomcat"),
            Segment::Exact("servlet"),
            Segment::Any,
            Segment::Any,
            Segment::OneOf(&["processingTime", "errorCount", "requestCount"]),
        ],
        source_suffix: &[2, 3],
        metric_key: MetricKey::Join(&[0, 1, 4]),
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::TomcatDb,
        pattern: &[
            Segment::Exact("tomcat"),
            Segment::Exact("data-source"),
            Segment::Any,
            Segment::Any,
            Segment::Any,
            Segment::Any,
        ],
        source_suffix: &[2, 3, 4],
        metric_key: MetricKey::Join(&[0, 1, 5]),
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::App,
        pattern: &[
            Segment::Exact("cocktail"),
            Segment::NoneOf(&["CreatedCocktailCount", "UpdatedCocktailCount"]),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
    Route {
        family: MetricFamily::AppSales,
        pattern: &[
            Segment::Exact("sales"),
            Segment::OneOf(&["ordersCounter", "itemsCounter", "revenueInCentsCounter"]),
        ],
        source_suffix: &[],
        metric_key: MetricKey::TypeName,
        transform: Transform::Identity,
    },
];

/// 첫 번째로 맞는 행
pub fn find_route(parts: &[&str]) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.matches(parts))
}

/// 행이 안 맞아도 동적 패밀리로 보내지 않고 버리는 접두사
///
/// `sales`는 세 카운터만 잡고 나머지는 동적 패밀리로 흘려보내므로 여기에 없다.
const CLAIMED_PREFIXES: &[&str] = &["jmxtrans", "jvm", "tomcat", "cocktail"];

/// 표가 소유한 접두사인지
pub fn is_claimed_prefix(prefix: &str) -> bool {
    CLAIMED_PREFIXES.contains(&prefix)
}
