//! 호스트(메트릭 수집 프레임워크) 포트.

use crate::models::sample::RawSample;

/// 호스트 쿼리: 한 번의 수집 결과 묶음
pub trait ResultSource: Send + Sync {
    /// 수집된 샘플 목록
    fn results(&self) -> Vec<RawSample>;
}

impl ResultSource for Vec<RawSample> {
    fn results(&self) -> Vec<RawSample> {
        self.clone()
    }
}
