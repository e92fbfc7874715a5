//! EGGSINK 핵심 에러 타입.
//!
//! `InvalidConfiguration`만 Writer 밖으로 전파되고, 나머지는 가장 좁은 경계에서
//! [`ErrorCounter`]로 기록된 뒤 삼켜진다.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 잘못된 설정 (파싱 불가 URL, 프록시 포트 누락 등). `start`를 중단시킨다.
    #[error("잘못된 설정: {0}")]
    InvalidConfiguration(String),

    /// 설정값 역직렬화 실패 (필수 키 누락 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 번들 카탈로그 파싱 실패
    #[error("카탈로그 파싱 실패: {0}")]
    CatalogParse(String),

    /// 카탈로그 동기화 실패: 해당 항목만 건너뛴다
    #[error("카탈로그 동기화 실패 ({name}): {message}")]
    Reconcile {
        /// 메트릭 그룹 또는 대시보드 이름
        name: String,
        /// 실패 사유
        message: String,
    },

    /// 샘플 분류 실패 (숫자가 아닌 값 등): 샘플만 버린다
    #[error("샘플 분류 실패 ({type_name}): {message}")]
    Classification {
        /// 원본 샘플의 dotted 이름
        type_name: String,
        /// 실패 사유
        message: String,
    },

    /// 샘플 업로드 실패: 배치만 버린다
    #[error("업로드 실패 ({group}): {message}")]
    Upload {
        /// 대상 메트릭 그룹
        group: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃, TLS)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// `start` 이전 또는 `stop` 이후 호출
    #[error("Writer가 시작되지 않음")]
    NotStarted,

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CoreError {
    fn from(e: config::ConfigError) -> Self {
        CoreError::Config(e.to_string())
    }
}

/// Writer 인스턴스 단위 예외 카운터.
///
/// 복제본은 같은 카운터를 공유한다. 새 인스턴스는 항상 0에서 시작한다.
#[derive(Debug, Clone, Default)]
pub struct ErrorCounter {
    count: Arc<AtomicU64>,
}

impl ErrorCounter {
    /// 새 카운터 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 에러를 로그로 남기고 카운터를 정확히 1 증가
    pub fn record(&self, context: &str, error: &CoreError) {
        let total = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        warn!("{context}: {error} (누적 예외 {total})");
    }

    /// 현재 누적 예외 수
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
