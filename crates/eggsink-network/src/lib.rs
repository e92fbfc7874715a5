//! # eggsink-network
//!
//! 싱크 HTTP 어댑터.
//! reqwest 기반 `SinkClient` 구현과 그 위에서 동작하는
//! 카탈로그 동기화, 샘플 업로드를 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use eggsink_network::auth::BasicCredentials;
//! use eggsink_network::http_client::SinkHttpClient;
//!
//! let client = SinkHttpClient::new(
//!     "https://api.copperegg.com/v2/revealmetrics",
//!     BasicCredentials::from_token("token"),
//!     Duration::from_millis(20_000),
//!     None,
//! )?;
//! ```

pub mod auth;
pub mod http_client;
pub mod reconciler;
pub mod uploader;
