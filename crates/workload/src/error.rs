//! 워크로드 에러 타입
//!
//! [`EmitterError`]는 생성기 설정, 재생 로그 파싱, 데이터 엔드포인트 호출을
//! 다룹니다. `From<EmitterError> for GoldenError`로 호출자가 `?`로 전파할 수
//! 있습니다.

use golden_core::error::{DeploymentError, GoldenError, WorkloadError};

/// 워크로드 emitter 에러
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// 생성기 또는 루프 파라미터를 사용할 수 없음
    #[error("invalid workload config: {field}: {reason}")]
    Config {
        /// 문제가 된 필드
        field: String,
        /// 거부 사유
        reason: String,
    },

    /// 재생 로그 줄 파싱 실패
    #[error("replay log line {line}: {reason}")]
    ReplayLog {
        /// 1부터 시작하는 줄 번호
        line: usize,
        /// 파싱 실패 내용
        reason: String,
    },

    /// 배포 엔드포인트 클라이언트 생성 실패
    #[error("cannot connect to deployment endpoint: {0}")]
    Connect(String),

    /// search 또는 index 요청 실패
    #[error("{op} on '{target}' failed: {reason}")]
    Operation {
        /// `search` 또는 `index`
        op: String,
        /// 인덱스 또는 패턴
        target: String,
        /// 전송 또는 서버 에러
        reason: String,
    },

    /// 생성 결과 쓰기 실패
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EmitterError> for GoldenError {
    fn from(err: EmitterError) -> Self {
        match err {
            EmitterError::Config { .. } => {
                GoldenError::Workload(WorkloadError::InvalidConfig(err.to_string()))
            }
            EmitterError::ReplayLog { .. } => {
                GoldenError::Workload(WorkloadError::ReplayLog(err.to_string()))
            }
            EmitterError::Connect(msg) => GoldenError::Deployment(DeploymentError::Connection(msg)),
            EmitterError::Operation { .. } => {
                GoldenError::Workload(WorkloadError::Operation(err.to_string()))
            }
            EmitterError::Io(e) => GoldenError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = EmitterError::Config {
            field: "max_count".to_owned(),
            reason: "max_count and max_offset_seconds cannot both be 0".to_owned(),
        };
        assert!(err.to_string().contains("max_count"));
    }

    #[test]
    fn connect_converts_to_deployment_connection() {
        let err: GoldenError = EmitterError::Connect("bad cloud id".to_owned()).into();
        assert!(matches!(
            err,
            GoldenError::Deployment(DeploymentError::Connection(_))
        ));
    }

    #[test]
    fn operation_converts_to_workload_error() {
        let err: GoldenError = EmitterError::Operation {
            op: "index".to_owned(),
            target: "foo".to_owned(),
            reason: "timeout".to_owned(),
        }
        .into();
        assert!(matches!(err, GoldenError::Workload(WorkloadError::Operation(_))));
        assert!(err.to_string().contains("index on 'foo'"));
    }
}
