//! 싱크 HTTP 클라이언트.
//!
//! `SinkClient` 포트 구현. 모든 요청에 JSON Content-Type과 Basic 인증 헤더를 붙이고,
//! 응답 본문은 상태 코드와 관계없이 끝까지 읽는다.

use async_trait::async_trait;
use eggsink_core::config::ProxySettings;
use eggsink_core::error::CoreError;
use eggsink_core::ports::sink_client::{SinkClient, SinkMethod, SinkResponse};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

use crate::auth::BasicCredentials;

/// 요청 Content-Type
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// reqwest 기반 싱크 클라이언트: `SinkClient` 포트 구현
pub struct SinkHttpClient {
    client: reqwest::Client,
    base_url: String,
    credentials: BasicCredentials,
}

impl SinkHttpClient {
    /// 새 싱크 클라이언트 생성
    ///
    /// `timeout`은 요청 하나의 전체 제한 시간. 프록시가 있으면 모든 트래픽이 프록시를 거친다.
    pub fn new(
        base_url: &str,
        credentials: BasicCredentials,
        timeout: Duration,
        proxy: Option<&ProxySettings>,
    ) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(proxy) = proxy {
            let proxy_url = format!("http://{}:{}", proxy.host, proxy.port);
            let proxy = reqwest::Proxy::all(&proxy_url).map_err(|e| {
                CoreError::InvalidConfiguration(format!("프록시 설정 실패 {proxy_url}: {e}"))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn to_reqwest_method(method: SinkMethod) -> reqwest::Method {
    match method {
        SinkMethod::Get => reqwest::Method::GET,
        SinkMethod::Post => reqwest::Method::POST,
        SinkMethod::Put => reqwest::Method::PUT,
    }
}

#[async_trait]
impl SinkClient for SinkHttpClient {
    async fn request(
        &self,
        method: SinkMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<SinkResponse, CoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("싱크 요청: {method} {url}");

        let mut request = self
            .client
            .request(to_reqwest_method(method), &url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(AUTHORIZATION, self.credentials.header_value());
        if let Some(body) = body {
            request = request.body(body);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("{method} {url} 요청 실패: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("{method} {url} 응답 읽기 실패: {e}")))?;

        if status != 200 {
            debug!("싱크 응답 {status}: {method} {url} 본문={body}");
        }

        Ok(SinkResponse { status, body })
    }
}
