//! # eggsink-writer
//!
//! jmxtrans 호스트용 CopperEgg 출력 어댑터.
//!
//! 호스트는 `start` → `write`* → `stop` 순으로 호출한다. `start`가 카탈로그를 싱크와
//! 동기화해 그룹 ID 테이블을 게시하고, 이후 `write`는 여러 스레드에서 락 없이 호출된다.
//!
//! ```rust,ignore
//! let settings = WriterSettings::from_properties(&host_settings)?;
//! let writer = CopperEggWriter::new(settings);
//! writer.start().await?;
//! let report = writer.write_query(&query).await;
//! writer.stop();
//! ```

pub mod catalog_loader;

use eggsink_core::config::WriterSettings;
use eggsink_core::error::{CoreError, ErrorCounter};
use eggsink_core::models::catalog::Catalog;
use eggsink_core::models::group::ReconciledIds;
use eggsink_core::models::sample::RawSample;
use eggsink_core::ports::host::ResultSource;
use eggsink_core::ports::sink_client::SinkClient;
use eggsink_network::auth::BasicCredentials;
use eggsink_network::http_client::SinkHttpClient;
use eggsink_network::reconciler::CatalogReconciler;
use eggsink_network::uploader::{SampleUploader, UploadOutcome};
use eggsink_pipeline::{into_batches, partition_by_group, Classifier};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// `write` 한 번의 처리 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// 레코드로 분류된 샘플
    pub samples_classified: usize,
    /// 미등록 그룹 등으로 조용히 버린 샘플
    pub samples_dropped: usize,
    /// 분류 실패 샘플
    pub samples_failed: usize,
    /// 200 응답을 받은 업로드 문서
    pub batches_sent: usize,
    /// 실패한 업로드 문서
    pub batches_failed: usize,
    /// 전송 실패로 보내지 않은 업로드 문서
    pub batches_skipped: usize,
}

impl WriteReport {
    fn add_upload(&mut self, outcome: UploadOutcome) {
        self.batches_sent += outcome.sent;
        self.batches_failed += outcome.failed;
        self.batches_skipped += outcome.skipped;
    }
}

/// `start` 이후 불변인 Writer 상태
struct StartedState {
    classifier: Classifier,
    uploader: SampleUploader,
}

/// CopperEgg Writer
pub struct CopperEggWriter {
    settings: WriterSettings,
    catalog: Option<Catalog>,
    pid: Option<u32>,
    errors: ErrorCounter,
    state: OnceCell<StartedState>,
    stopped: AtomicBool,
}

impl CopperEggWriter {
    /// 새 Writer 생성 (네트워크 호출 없음)
    pub fn new(settings: WriterSettings) -> Self {
        Self {
            settings,
            catalog: None,
            pid: None,
            errors: ErrorCounter::new(),
            state: OnceCell::new(),
            stopped: AtomicBool::new(false),
        }
    }

    /// 호스트 설정 맵으로 생성
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, CoreError> {
        Ok(Self::new(WriterSettings::from_properties(properties)?))
    }

    /// 카탈로그 직접 지정: 내장 카탈로그와 `catalog_path`를 무시한다
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// source_id에 쓸 프로세스 ID 지정 (기본: 현재 프로세스)
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// 시작: 카탈로그 로드 및 싱크 동기화
    ///
    /// 두 번째 호출(동시 호출 포함)은 no-op. 설정 오류(URL, 프록시)와 HTTP 클라이언트 생성
    /// 실패만 에러로 반환하고, 동기화 실패는 예외 카운터에만 남는다.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.state
            .get_or_try_init(|| self.initialize())
            .await
            .inspect_err(|e| self.errors.record("start 실패", e))?;
        Ok(())
    }

    async fn initialize(&self) -> Result<StartedState, CoreError> {
        let base_url = url::Url::parse(&self.settings.url).map_err(|e| {
            CoreError::InvalidConfiguration(format!("잘못된 URL '{}': {e}", self.settings.url))
        })?;
        let proxy = self.settings.proxy()?;
        let pid = self.pid.unwrap_or_else(std::process::id);

        let client: Arc<dyn SinkClient> = Arc::new(SinkHttpClient::new(
            base_url.as_str(),
            BasicCredentials::from_token(&self.settings.token),
            self.settings.read_timeout(),
            proxy.as_ref(),
        )?);

        let catalog = match &self.catalog {
            Some(catalog) => catalog.clone(),
            None => catalog_loader::load_catalog(self.settings.catalog_path.as_deref(), &self.errors),
        };

        let ids = CatalogReconciler::new(client.clone(), self.errors.clone())
            .sync_catalog(&catalog, self.settings.dynamic_group_id())
            .await;

        let classifier = Classifier::new(&self.settings.source, pid, ids);
        info!(
            "CopperEgg Writer 시작: {} (source={})",
            base_url,
            classifier.source_pid()
        );

        Ok(StartedState {
            classifier,
            uploader: SampleUploader::new(client, self.errors.clone()),
        })
    }

    /// 샘플 묶음 처리: 분류, 그룹별 정렬, 업로드
    ///
    /// 실패는 모두 예외 카운터에 기록되고 호출자에게는 보고서만 돌아간다.
    pub async fn write(&self, samples: &[RawSample]) -> WriteReport {
        let mut report = WriteReport::default();

        let state = match self.state.get() {
            Some(state) if !self.stopped.load(Ordering::Acquire) => state,
            _ => {
                self.errors.record("write 무시", &CoreError::NotStarted);
                report.samples_dropped = samples.len();
                return report;
            }
        };

        let mut records = Vec::with_capacity(samples.len());
        for sample in samples {
            match state.classifier.classify(sample) {
                Ok(Some(record)) => {
                    report.samples_classified += 1;
                    records.push(record);
                }
                Ok(None) => report.samples_dropped += 1,
                Err(e) => {
                    self.errors.record("샘플 분류 실패", &e);
                    report.samples_failed += 1;
                }
            }
        }

        let uploader = &state.uploader;
        let uploads: Vec<_> = partition_by_group(records)
            .into_iter()
            .map(|(group, records)| {
                let batches = into_batches(records);
                async move { uploader.upload_group(&group, &batches).await }
            })
            .collect();

        let outcomes: Vec<UploadOutcome> = stream::iter(uploads)
            .buffer_unordered(self.settings.max_concurrent_uploads.max(1))
            .collect()
            .await;

        for outcome in outcomes {
            report.add_upload(outcome);
        }
        debug!("write 완료: {report:?}");
        report
    }

    /// 호스트 쿼리 결과 처리
    pub async fn write_query(&self, query: &dyn ResultSource) -> WriteReport {
        self.write(&query.results()).await
    }

    /// 호스트 계약용: 검사할 것이 없다
    pub fn validate(&self, _query: &dyn ResultSource) -> Result<(), CoreError> {
        debug!("validate: 그룹 ID {:?}", self.ids());
        Ok(())
    }

    /// 정지: 이후 `write`는 아무것도 보내지 않는다
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        info!(
            "CopperEgg Writer 정지 (누적 예외 {})",
            self.errors.get()
        );
    }

    /// 누적 예외 수
    pub fn exception_count(&self) -> u64 {
        self.errors.get()
    }

    /// 동기화된 그룹 ID 테이블 (`start` 전에는 `None`)
    pub fn ids(&self) -> Option<&ReconciledIds> {
        self.state.get().map(|state| state.classifier.ids())
    }

    /// `<source>.<pid>` (`start` 전에는 `None`)
    pub fn source_pid(&self) -> Option<&str> {
        self.state.get().map(|state| state.classifier.source_pid())
    }
}
