//! 러너 에러 타입

use golden_core::error::{GoldenError, ScenarioError};
use golden_deployment::ProvisionError;
use golden_state::StateError;
use golden_workload::EmitterError;

/// [`ScenarioRunner`](crate::ScenarioRunner) 연산이 반환하는 에러
///
/// 백그라운드 루프는 에러를 반환하지 않고 로그로 남깁니다.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// 시나리오 정의를 사용할 수 없음
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    /// 골든 배포를 찾거나 생성하지 못함
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// 배포 데이터 엔드포인트 클라이언트를 만들지 못함
    #[error(transparent)]
    Connect(#[from] EmitterError),

    /// 시나리오 저장 실패
    #[error(transparent)]
    State(#[from] StateError),

    /// drain 기한 안에 루프 태스크가 끝나지 않음
    #[error("{remaining} scenario loop(s) still running after {timeout_secs}s")]
    ShutdownTimeout { remaining: usize, timeout_secs: u64 },
}

impl From<RunnerError> for GoldenError {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::Scenario(e) => e.into(),
            RunnerError::Provision(e) => e.into(),
            RunnerError::Connect(e) => e.into(),
            RunnerError::State(e) => e.into(),
            RunnerError::ShutdownTimeout { .. } => GoldenError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                err.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_core::error::{DeploymentError, StorageError};

    #[test]
    fn provisioning_failure_maps_to_deployment_error() {
        let err: GoldenError = RunnerError::from(ProvisionError::Api("[500] boom".to_owned())).into();
        assert!(matches!(
            err,
            GoldenError::Deployment(DeploymentError::Provisioning(_))
        ));
    }

    #[test]
    fn state_failure_maps_to_storage_error() {
        let err: GoldenError = RunnerError::from(StateError::Http("refused".to_owned())).into();
        assert!(matches!(err, GoldenError::Storage(StorageError::Connection(_))));
    }

    #[test]
    fn timeout_message_names_remaining_loops() {
        let err = RunnerError::ShutdownTimeout {
            remaining: 3,
            timeout_secs: 30,
        };
        assert_eq!(err.to_string(), "3 scenario loop(s) still running after 30s");
    }
}
