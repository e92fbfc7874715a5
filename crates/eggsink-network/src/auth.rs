//! 싱크 Basic 인증.
//!
//! 싱크는 API 토큰을 사용자 이름으로, 리터럴 `U`를 비밀번호로 받는다.
//! 설정의 `username`은 호환성을 위해 무시되고 `token`이 그 자리를 대신한다.

use base64::Engine;

/// 고정 비밀번호
const SINK_PASSWORD: &str = "U";

/// Basic 인증 자격 증명: `Authorization` 헤더 값을 미리 계산해 둔다
#[derive(Clone)]
pub struct BasicCredentials {
    header_value: String,
}

impl BasicCredentials {
    /// 토큰으로 자격 증명 생성
    pub fn from_token(token: &str) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{token}:{SINK_PASSWORD}"));
        Self {
            header_value: format!("Basic {encoded}"),
        }
    }

    /// `Authorization` 헤더 값 ("Basic ...")
    pub fn header_value(&self) -> &str {
        &self.header_value
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials").finish_non_exhaustive()
    }
}
