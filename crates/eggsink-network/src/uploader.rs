//! 샘플 업로더.
//!
//! 배치 하나 = `POST /samples/<group>.json` 한 번. 재시도는 하지 않는다.

use eggsink_core::error::{CoreError, ErrorCounter};
use eggsink_core::models::record::SampleBatch;
use eggsink_core::ports::sink_client::SinkClient;
use std::sync::Arc;
use tracing::debug;

/// 그룹 하나의 업로드 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    /// 200 응답을 받은 배치
    pub sent: usize,
    /// 실패한 배치 (non-200, 직렬화 실패, 전송 실패)
    pub failed: usize,
    /// 전송 실패 후 보내지 않은 배치
    pub skipped: usize,
}

/// 샘플 업로더
pub struct SampleUploader {
    client: Arc<dyn SinkClient>,
    errors: ErrorCounter,
}

impl SampleUploader {
    /// 새 업로더 생성: 실패는 `errors`에 기록된다
    pub fn new(client: Arc<dyn SinkClient>, errors: ErrorCounter) -> Self {
        Self { client, errors }
    }

    /// 한 그룹의 배치를 정렬 순서대로 업로드
    ///
    /// non-200은 기록 후 다음 배치로 넘어가고, 전송 실패는 그룹의 남은 배치를 포기한다.
    pub async fn upload_group(&self, group: &str, batches: &[SampleBatch]) -> UploadOutcome {
        let mut outcome = UploadOutcome::default();
        let path = format!("/samples/{group}.json");

        for (idx, batch) in batches.iter().enumerate() {
            let body = match serde_json::to_string(batch) {
                Ok(body) => body,
                Err(e) => {
                    self.errors.record("배치 직렬화 실패", &CoreError::from(e));
                    outcome.failed += 1;
                    continue;
                }
            };

            match self.client.post(&path, body).await {
                Ok(resp) if resp.is_ok() => {
                    debug!(
                        "업로드 완료: {group} {} @{} ({}개 값)",
                        batch.identifier,
                        batch.timestamp,
                        batch.len()
                    );
                    outcome.sent += 1;
                }
                Ok(resp) => {
                    let err = CoreError::Upload {
                        group: group.to_string(),
                        message: format!("HTTP {}: {}", resp.status, resp.body),
                    };
                    self.errors.record("샘플 업로드 거부", &err);
                    outcome.failed += 1;
                }
                Err(e) => {
                    let err = CoreError::Upload {
                        group: group.to_string(),
                        message: e.to_string(),
                    };
                    self.errors.record("샘플 업로드 중단", &err);
                    outcome.failed += 1;
                    outcome.skipped = batches.len() - idx - 1;
                    break;
                }
            }
        }
        outcome
    }
}
