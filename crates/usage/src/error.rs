//! 사용량 텔레메트리 에러 타입
//!
//! [`UsageError`]는 [`GoldenError`]로 변환되어 호출자가 `?`로 전파할 수 있습니다.

use golden_core::error::{GoldenError, TelemetryError};

/// 사용량 텔레메트리 조회 중 발생하는 에러
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// 응답을 받기 전 전송 실패
    #[error("usage cluster request failed: {0}")]
    Http(String),

    /// 클러스터가 에러 상태로 응답함
    #[error("usage query error: {0}")]
    Query(String),

    /// 응답 본문 형태가 예상과 다름
    #[error("failed to decode usage response: {0}")]
    Decode(String),

    /// 이 메트릭의 소스가 설정되지 않음
    #[error("no usage source configured for metric '{0}'")]
    Unmapped(String),

    /// 클라이언트 생성 실패
    #[error("invalid usage client config: {0}")]
    Config(String),
}

impl From<UsageError> for GoldenError {
    fn from(err: UsageError) -> Self {
        match &err {
            UsageError::Http(_) | UsageError::Config(_) => {
                GoldenError::Telemetry(TelemetryError::Connection(err.to_string()))
            }
            UsageError::Query(_) | UsageError::Decode(_) => {
                GoldenError::Telemetry(TelemetryError::Query(err.to_string()))
            }
            UsageError::Unmapped(metric) => {
                GoldenError::Telemetry(TelemetryError::Unsupported(metric.clone()))
            }
        }
    }
}

impl From<reqwest::Error> for UsageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UsageError::Decode(err.to_string())
        } else {
            UsageError::Http(err.to_string())
        }
    }
}
