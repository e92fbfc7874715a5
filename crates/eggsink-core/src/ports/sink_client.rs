//! 싱크 HTTP 클라이언트 포트.
//!
//! 구현: `eggsink-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;

/// 싱크 요청 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMethod {
    Get,
    Post,
    Put,
}

impl std::fmt::Display for SinkMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkMethod::Get => write!(f, "GET"),
            SinkMethod::Post => write!(f, "POST"),
            SinkMethod::Put => write!(f, "PUT"),
        }
    }
}

/// 싱크 응답: 본문은 항상 끝까지 읽은 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status: u16,
    pub body: String,
}

impl SinkResponse {
    /// 싱크는 200만 성공으로 본다
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// 싱크 REST API 클라이언트
///
/// 전송 계층 실패만 `Err`이고, 200이 아닌 상태 코드는 응답으로 돌려준다.
#[async_trait]
pub trait SinkClient: Send + Sync {
    /// 요청 실행. `path`는 기본 URL 뒤에 붙는다 (예: "/metric_groups.json").
    async fn request(
        &self,
        method: SinkMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<SinkResponse, CoreError>;

    async fn get(&self, path: &str) -> Result<SinkResponse, CoreError> {
        self.request(SinkMethod::Get, path, None).await
    }

    async fn post(&self, path: &str, body: String) -> Result<SinkResponse, CoreError> {
        self.request(SinkMethod::Post, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: String) -> Result<SinkResponse, CoreError> {
        self.request(SinkMethod::Put, path, Some(body)).await
    }
}
