//! 배포 프로비저닝 에러 타입
//!
//! [`ProvisionError`]는 템플릿 렌더링과 배포 API 호출에서 발생하는 에러를 표현합니다.
//! `From<ProvisionError> for GoldenError` 변환으로 `?` 전파가 가능합니다.

use golden_core::error::{DeploymentError, GoldenError};

/// 배포 프로비저닝 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// 템플릿 파일 로딩/파싱 실패
    #[error("deployment template '{id}': {reason}")]
    Template {
        /// 템플릿 ID
        id: String,
        /// 실패 사유
        reason: String,
    },

    /// 템플릿에 선언되지 않은 변수
    #[error("undefined variable '{name}' in deployment template '{id}'")]
    UndefinedVariable {
        /// 템플릿 ID
        id: String,
        /// 변수 이름
        name: String,
    },

    /// 배포 API 요청 전송 실패
    #[error("deployment api request failed: {0}")]
    Http(String),

    /// 배포 API가 에러 응답을 반환함
    #[error("deployment api error: {0}")]
    Api(String),

    /// 응답 형식이 예상과 다름
    #[error("unexpected deployment api response: {0}")]
    Decode(String),

    /// 설정 오류
    #[error("provisioner config error: {0}")]
    Config(String),
}

impl From<ProvisionError> for GoldenError {
    fn from(err: ProvisionError) -> Self {
        match &err {
            ProvisionError::Template { .. } | ProvisionError::UndefinedVariable { .. } => {
                GoldenError::Deployment(DeploymentError::Template(err.to_string()))
            }
            ProvisionError::Http(_) | ProvisionError::Config(_) => {
                GoldenError::Deployment(DeploymentError::Connection(err.to_string()))
            }
            ProvisionError::Api(_) | ProvisionError::Decode(_) => {
                GoldenError::Deployment(DeploymentError::Provisioning(err.to_string()))
            }
        }
    }
}

impl From<reqwest::Error> for ProvisionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProvisionError::Decode(err.to_string())
        } else {
            ProvisionError::Http(err.to_string())
        }
    }
}
