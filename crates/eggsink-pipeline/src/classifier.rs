//! 샘플 분류기.
//!
//! 원본 샘플 하나를 (그룹, source_id, 메트릭 키, 값, 초) 레코드로 바꾸거나 버린다.
//! Writer 상태 위에서 상태 없이 동작하므로 여러 스레드에서 락 없이 호출할 수 있다.

use eggsink_core::error::CoreError;
use eggsink_core::models::group::{MetricFamily, ReconciledIds};
use eggsink_core::models::record::ClassifiedRecord;
use eggsink_core::models::sample::RawSample;
use tracing::debug;

use crate::routes::{find_route, is_claimed_prefix};
use crate::value;

/// 분류기: `<source>.<pid>`와 동기화된 그룹 ID 테이블을 보관
#[derive(Debug, Clone)]
pub struct Classifier {
    source_pid: String,
    ids: ReconciledIds,
}

impl Classifier {
    /// 새 분류기 생성
    pub fn new(source: &str, pid: u32, ids: ReconciledIds) -> Self {
        Self {
            source_pid: format!("{source}.{pid}"),
            ids,
        }
    }

    /// `<source>.<pid>`
    pub fn source_pid(&self) -> &str {
        &self.source_pid
    }

    pub fn ids(&self) -> &ReconciledIds {
        &self.ids
    }

    /// 샘플 분류
    ///
    /// - `Ok(Some)`: 레코드 하나
    /// - `Ok(None)`: 그룹 미등록 또는 표에 없는 이름 (조용히 버림)
    /// - `Err(Classification)`: 값 파싱 실패
    pub fn classify(&self, sample: &RawSample) -> Result<Option<ClassifiedRecord>, CoreError> {
        let parts: Vec<&str> = sample.type_name.split('.').collect();

        if let Some(route) = find_route(&parts) {
            let Some(group) = self.ids.upload_target(route.family) else {
                debug!(
                    "미등록 그룹 {}: 샘플 버림: {}",
                    route.family, sample.type_name
                );
                return Ok(None);
            };

            let raw = value::single_value(sample)
                .map_err(|message| classification_error(sample, message))?;

            return Ok(Some(ClassifiedRecord {
                group_key: group.to_string(),
                source_id: route.source_id(&self.source_pid, &parts),
                metric_key: route.metric_key(&sample.type_name, &parts),
                value: value::apply(route.transform, raw),
                timestamp_s: sample.timestamp_s(),
            }));
        }

        if is_claimed_prefix(parts[0]) {
            debug!("라우팅 표에 없는 이름: 샘플 버림: {}", sample.type_name);
            return Ok(None);
        }

        self.classify_dynamic(sample)
    }

    /// 표에 없는 접두사: 동적 패밀리 기본 경로
    fn classify_dynamic(&self, sample: &RawSample) -> Result<Option<ClassifiedRecord>, CoreError> {
        let Some(group) = self.ids.upload_target(MetricFamily::Dynamic) else {
            debug!("동적 패밀리 비활성: 샘플 버림: {}", sample.type_name);
            return Ok(None);
        };

        let (key, raw) =
            value::summary_pair(sample).map_err(|message| classification_error(sample, message))?;
        let parsed = value::typed_summary_value(&key, &raw)
            .map_err(|message| classification_error(sample, message))?;

        Ok(Some(ClassifiedRecord {
            group_key: group.to_string(),
            source_id: self.source_pid.clone(),
            metric_key: format!("{}.{}", sample.class_name_alias, key),
            value: parsed,
            timestamp_s: sample.timestamp_s(),
        }))
    }
}

fn classification_error(sample: &RawSample, message: String) -> CoreError {
    CoreError::Classification {
        type_name: sample.type_name.clone(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eggsink_core::models::record::MetricValue;
    use serde_json::json;

    /// 모든 고정 그룹이 등록된 분류기 (PID=42, source="h")
    fn classifier() -> Classifier {
        let mut ids = ReconciledIds::new(Some("jeff_test2"));
        for family in MetricFamily::STATIC {
            let name = family.group_name().unwrap();
            ids.record_metric_group(name, &format!("id_{name}"));
        }
        Classifier::new("h", 42, ids)
    }

    fn classify(name: &str, value: serde_json::Value) -> ClassifiedRecord {
        classifier()
            .classify(&RawSample::new(1_700_000_000_123, name, "n", value))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn open_file_descriptors_identity() {
        let record = classify("jvm.os.OpenFileDescriptorCount", json!(128));
        assert_eq!(record.group_key, "jvm_os");
        assert_eq!(record.source_id, "h.42");
        assert_eq!(record.metric_key, "jvm.os.OpenFileDescriptorCount");
        assert_eq!(record.value, MetricValue::Int(128));
        assert_eq!(record.timestamp_s, 1_700_000_000);
    }

    #[test]
    fn unit_conversion_rows() {
        let cases = [
            ("jvm.os.ProcessCpuTime", json!(5_000_000_000_i64), "jvm_os", 5.0),
            ("jvm.os.CommittedVirtualMemorySize", json!(1_048_576), "jvm_os", 1.0),
            ("jvm.runtime.Uptime", json!(120_000), "jvm_runtime", 2.0),
            (
                "tomcat.global-request-processor.http-8080.processingTime",
                json!(2048),
                "tomcat_grp",
                2.0,
            ),
        ];
        for (name, raw, group, expected) in cases {
            let record = classify(name, raw);
            assert_eq!(record.group_key, group, "{name}");
            assert_eq!(record.value, MetricValue::Float(expected), "{name}");
        }
    }

    #[test]
    fn heap_pool_rewrites_key_and_source() {
        let record = classify("jvm.memorypool.Eden_Space.usage.used", json!(1_048_576));
        assert_eq!(record.group_key, "heap");
        assert_eq!(record.source_id, "h.42.Eden_Space.used");
        assert_eq!(record.metric_key, "jvmHeapMemoryUsage");
        assert_eq!(record.value, MetricValue::Float(1.0));
    }

    #[test]
    fn tomcat_rows() {
        let record = classify("tomcat.thread-pool.http-8080.currentThreadCount", json!(3));
        assert_eq!(record.group_key, "tomcat_thread_pool");
        assert_eq!(record.source_id, "h.42.http-8080");
        assert_eq!(record.metric_key, "tomcat.thread-pool.currentThreadCount");
        assert_eq!(record.value, MetricValue::Int(3));

        let record = classify("tomcat.global-request-processor.http-8080.errorCount", json!(4));
        assert_eq!(record.metric_key, "tomcat.global-request-processor.errorCount");
        assert_eq!(record.value, MetricValue::Int(4));

        let record = classify("tomcat.manager.localhost.shop.activeSessions", json!(9));
        assert_eq!(record.group_key, "tomcat_manager");
        assert_eq!(record.source_id, "h.42.localhost.shop");
        assert_eq!(record.metric_key, "tomcat.manager.activeSessions");

        let record = classify("tomcat.servlet.shop.checkout.requestCount", json!(11));
        assert_eq!(record.group_key, "tomcat_servlet");
        assert_eq!(record.source_id, "h.42.shop.checkout");
        assert_eq!(record.metric_key, "tomcat.servlet.requestCount");
    }

    #[test]
    fn app_rows_keep_type_name() {
        let record = classify("sales.ordersCounter", json!(17));
        assert_eq!(record.group_key, "app_sales");
        assert_eq!(record.metric_key, "sales.ordersCounter");

        let record = classify("jmxtrans.Queries.count", json!(2));
        assert_eq!(record.group_key, "jmxtrans");
        assert_eq!(record.source_id, "h.42");
    }

    #[test]
    fn unregistered_group_drops_silently() {
        let mut ids = ReconciledIds::new(None);
        ids.record_metric_group("heap", "h1");
        let classifier = Classifier::new("h", 42, ids);

        let sample = RawSample::new(0, "jvm.os.OpenFileDescriptorCount", "n", json!("garbage"));
        assert!(classifier.classify(&sample).unwrap().is_none());

        let sample = RawSample::new(0, "cassandra.Foo", "HeapSize", json!(1));
        assert!(classifier.classify(&sample).unwrap().is_none());
    }

    #[test]
    fn claimed_prefix_without_row_is_dropped() {
        let c = classifier();
        for name in [
            "jvm.os.SystemLoadAverage",
            "tomcat.cache.hits",
            "cocktail.UpdatedCocktailCount",
        ] {
            let sample = RawSample::new(0, name, "n", json!(1));
            assert!(c.classify(&sample).unwrap().is_none(), "{name}");
        }
    }

    #[test]
    fn dynamic_family_default_path() {
        let sample = RawSample::new(1_700_000_004_000, "cassandra.Foo", "HeapSize", json!(4096))
            .with_alias("Bar");
        let record = classifier().classify(&sample).unwrap().unwrap();
        assert_eq!(record.group_key, "jeff_test2");
        assert_eq!(record.source_id, "h.42");
        assert_eq!(record.metric_key, "Bar.HeapSize");
        assert_eq!(record.value, MetricValue::Int(4096));
        assert_eq!(record.timestamp_s, 1_700_000_004);
    }

    #[test]
    fn unlisted_sales_counter_takes_dynamic_path() {
        let sample = RawSample::new(1_700_000_005_000, "sales.refundsCounter", "count", json!(5))
            .with_alias("Shop");
        let record = classifier().classify(&sample).unwrap().unwrap();
        assert_eq!(record.group_key, "jeff_test2");
        assert_eq!(record.source_id, "h.42");
        assert_eq!(record.metric_key, "Shop.count");
        assert_eq!(record.value, MetricValue::Int(5));

        let record = classify("sales.itemsCounter", json!(3));
        assert_eq!(record.group_key, "app_sales");
    }

    #[test]
    fn malformed_value_is_classification_error() {
        let sample = RawSample::new(0, "jvm.thread.ThreadCount", "n", json!("many"));
        let err = classifier().classify(&sample).unwrap_err();
        assert!(matches!(err, CoreError::Classification { .. }));

        let sample = RawSample::new(0, "cassandra.Foo", "Pending", json!("x")).with_alias("C");
        assert!(classifier().classify(&sample).is_err());
    }

    #[test]
    fn source_id_always_prefixed_by_source_pid() {
        let c = classifier();
        for name in [
            "jvm.gc.Copy.CollectionCount",
            "jvm.memorypool.Perm_Gen.usage.used",
            "tomcat.data-source.localhost.shop.main.numIdle",
            "cocktail.Poured",
        ] {
            let record = c
                .classify(&RawSample::new(0, name, "n", json!(1)))
                .unwrap()
                .unwrap();
            assert!(record.source_id.starts_with("h.42"), "{name}");
        }
    }
}
