//! 상태 저장소 에러 타입

use golden_core::error::{GoldenError, StorageError};

/// [`StateStore`](crate::StateStore) 구현체가 반환하는 에러
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// 저장소에 연결할 수 없음
    #[error("state store request failed: {0}")]
    Http(String),

    /// 저장소가 에러 상태로 응답함
    #[error("state store query failed: {0}")]
    Query(String),

    /// 저장된 문서를 디코딩할 수 없음
    #[error("state store decode failed: {0}")]
    Decode(String),

    /// 해당 ID의 시나리오가 없음
    #[error("scenario '{0}' not found")]
    NotFound(String),

    /// 레코드를 그대로 저장할 수 없음
    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("state store config error: {0}")]
    Config(String),
}

impl From<StateError> for GoldenError {
    fn from(err: StateError) -> Self {
        let storage = match &err {
            StateError::Http(_) | StateError::Config(_) => StorageError::Connection(err.to_string()),
            StateError::NotFound(id) => StorageError::NotFound(id.clone()),
            StateError::Query(_) | StateError::Decode(_) | StateError::Invalid(_) => {
                StorageError::Query(err.to_string())
            }
        };
        GoldenError::Storage(storage)
    }
}

impl From<reqwest::Error> for StateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StateError::Decode(err.to_string())
        } else {
            StateError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_the_id() {
        let err: GoldenError = StateError::NotFound("abc".to_owned()).into();
        match err {
            GoldenError::Storage(StorageError::NotFound(id)) => assert_eq!(id, "abc"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn transport_errors_are_connection_errors() {
        let err: GoldenError = StateError::Http("refused".to_owned()).into();
        assert!(matches!(err, GoldenError::Storage(StorageError::Connection(_))));
    }
}
