//! Writer 설정 구조체.
//!
//! 싱크 URL, 인증 토큰, 프록시, 타임아웃, source 식별자 등을 정의한다.
//! 호스트가 넘겨주는 문자열 설정 맵이나 설정 파일/환경변수에서 `config` crate로 로드.
//!
//! 호스트 키는 camelCase(`proxyHost`)이고 `config` crate는 키를 소문자로 바꿀 수 있으므로
//! 필드마다 camelCase/소문자 alias를 둔다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;

/// 기본 싱크 API URL
pub const DEFAULT_API_URL: &str = "https://api.copperegg.com/v2/revealmetrics";

/// 기본 읽기 타임아웃 (밀리초)
pub const DEFAULT_API_TIMEOUT_MS: u64 = 20_000;

/// 기본 source: 호스트가 다른 곳에서 해석하는 토큰, 여기서는 리터럴로 취급
pub const DEFAULT_SOURCE: &str = "#hostname#";

/// 동적 패밀리의 초기 그룹 ID (자리표시자, 동기화 시 덮어쓴다)
pub const DEFAULT_DYNAMIC_GROUP: &str = "jeff_test2";

/// 환경변수 접두사 (`COPPEREGG_TOKEN` 등)
const ENV_PREFIX: &str = "COPPEREGG";

/// Writer 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterSettings {
    /// 싱크 API 기본 URL
    #[serde(default = "default_url")]
    pub url: String,
    /// 사용자 이름 (호환성 때문에 Basic 인증에서는 token으로 덮어쓴다)
    pub username: String,
    /// API 토큰
    pub token: String,
    /// HTTP 프록시 호스트
    #[serde(default, alias = "proxyHost", alias = "proxyhost")]
    pub proxy_host: Option<String>,
    /// HTTP 프록시 포트
    #[serde(default, alias = "proxyPort", alias = "proxyport")]
    pub proxy_port: Option<u16>,
    /// 읽기 타임아웃 (밀리초)
    #[serde(
        default = "default_api_timeout_ms",
        alias = "coppereggApiTimeoutInMillis",
        alias = "coppereggapitimeoutinmillis"
    )]
    pub copperegg_api_timeout_in_millis: u64,
    /// source 식별자
    #[serde(default = "default_source")]
    pub source: String,
    /// 동적 패밀리 그룹 ID (빈 문자열이면 비활성화)
    #[serde(
        default = "default_dynamic_group",
        alias = "dynamicGroup",
        alias = "dynamicgroup"
    )]
    pub dynamic_group: Option<String>,
    /// 번들 카탈로그 대신 읽을 파일 경로
    #[serde(default, alias = "catalogPath", alias = "catalogpath")]
    pub catalog_path: Option<PathBuf>,
    /// 한 번의 write에서 동시에 업로드할 그룹 수
    #[serde(
        default = "default_max_concurrent_uploads",
        alias = "maxConcurrentUploads",
        alias = "maxconcurrentuploads"
    )]
    pub max_concurrent_uploads: usize,
}

/// 해석된 프록시 주소
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
}

impl WriterSettings {
    /// 인증 정보만 지정하고 나머지는 기본값으로 생성
    pub fn with_credentials(username: &str, token: &str) -> Self {
        Self {
            url: default_url(),
            username: username.to_string(),
            token: token.to_string(),
            proxy_host: None,
            proxy_port: None,
            copperegg_api_timeout_in_millis: DEFAULT_API_TIMEOUT_MS,
            source: default_source(),
            dynamic_group: default_dynamic_group(),
            catalog_path: None,
            max_concurrent_uploads: default_max_concurrent_uploads(),
        }
    }

    /// 호스트 설정 맵에서 로드
    ///
    /// 값은 모두 문자열이며 숫자 필드는 `config` crate가 변환한다.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();
        for (key, value) in properties {
            builder = builder.set_override(key.as_str(), value.as_str())?;
        }
        Ok(builder.build()?.try_deserialize()?)
    }

    /// 설정 파일(선택) + `COPPEREGG_*` 환경변수에서 로드
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
        Ok(builder.build()?.try_deserialize()?)
    }

    /// 읽기 타임아웃
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.copperegg_api_timeout_in_millis)
    }

    /// 동적 패밀리 초기 그룹 ID (비활성화 시 `None`)
    pub fn dynamic_group_id(&self) -> Option<&str> {
        self.dynamic_group.as_deref().filter(|g| !g.is_empty())
    }

    /// 프록시 설정 해석
    ///
    /// 호스트가 비어 있으면 프록시 없음. 호스트가 있는데 포트가 없으면 설정 오류.
    pub fn proxy(&self) -> Result<Option<ProxySettings>, CoreError> {
        let host = match self.proxy_host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => host,
            _ => return Ok(None),
        };
        let port = self.proxy_port.ok_or_else(|| {
            CoreError::InvalidConfiguration(format!("프록시 포트 누락: proxyHost={host}"))
        })?;
        Ok(Some(ProxySettings {
            host: host.to_string(),
            port,
        }))
    }
}

fn default_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_timeout_ms() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_dynamic_group() -> Option<String> {
    Some(DEFAULT_DYNAMIC_GROUP.to_string())
}

fn default_max_concurrent_uploads() -> usize {
    4
}
