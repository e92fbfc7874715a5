//! 배치 정렬기.
//!
//! 그룹별 레코드를 (초, source_id) 순으로 안정 정렬한 뒤
//! 같은 (초, source_id)가 이어지는 구간마다 업로드 문서 하나를 만든다.

use eggsink_core::models::record::{ClassifiedRecord, SampleBatch};
use std::collections::BTreeMap;

/// 레코드를 업로드 대상 그룹별로 나눈다
pub fn partition_by_group(
    records: Vec<ClassifiedRecord>,
) -> BTreeMap<String, Vec<ClassifiedRecord>> {
    let mut groups: BTreeMap<String, Vec<ClassifiedRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.group_key.clone()).or_default().push(record);
    }
    groups
}

/// (timestamp_s 오름차순, source_id 사전순) 안정 정렬
pub fn sort_records(records: &mut [ClassifiedRecord]) {
    records.sort_by(|a, b| {
        a.timestamp_s
            .cmp(&b.timestamp_s)
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
}

/// 한 그룹의 레코드 → 업로드 배치 목록 (정렬 순서 유지)
///
/// 빈 입력이면 빈 목록: HTTP 호출 없음.
pub fn into_batches(mut records: Vec<ClassifiedRecord>) -> Vec<SampleBatch> {
    sort_records(&mut records);

    let mut batches: Vec<SampleBatch> = Vec::new();
    for record in &records {
        match batches.last_mut() {
            Some(current)
                if current.timestamp == record.timestamp_s
                    && current.identifier == record.source_id =>
            {
                current.push(record);
            }
            _ => {
                let mut batch = SampleBatch::new(&record.source_id, record.timestamp_s);
                batch.push(record);
                batches.push(batch);
            }
        }
    }
    batches
}
