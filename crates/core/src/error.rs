//! 에러 타입: 도메인별 에러 정의
//!
//! 각 기능 크레이트는 자체 에러 타입을 정의하고
//! `From<...> for GoldenError` 변환을 구현하여 `?`로 전파합니다.

/// Golden 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum GoldenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 시나리오 정의 에러
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// 배포 프로비저닝/연결 에러
    #[error("deployment error: {0}")]
    Deployment(#[from] DeploymentError),

    /// 상태 저장소 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// 사용량 텔레메트리 에러
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// 워크로드 생성/실행 에러
    #[error("workload error: {0}")]
    Workload(#[from] WorkloadError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 시나리오 정의 에러
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// 시나리오 ID가 없음
    #[error("scenario does not have an ID")]
    MissingId,

    /// 이미 ID가 할당됨
    #[error("scenario already has ID '{0}'")]
    IdAlreadyAssigned(String),

    /// 기대 범위가 min > max
    #[error("invalid expected range for '{metric}': min {min} > max {max}")]
    InvalidRange { metric: String, min: f64, max: f64 },

    /// 워크로드 설정 오류
    #[error("invalid workload field '{field}': {reason}")]
    InvalidWorkload { field: String, reason: String },

    /// 검증 설정 오류
    #[error("invalid validations field '{field}': {reason}")]
    InvalidValidations { field: String, reason: String },

    /// 시간 경계 파싱 실패
    #[error("invalid time bound '{0}': expected RFC 3339 or a 'now' expression")]
    InvalidTimeBound(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("scenario serialization failed: {0}")]
    Serialization(String),
}

/// 배포 프로비저닝/연결 에러
#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    /// 배포 생성/조회 실패
    #[error("provisioning failed: {0}")]
    Provisioning(String),

    /// 배포 템플릿 오류
    #[error("template error: {0}")]
    Template(String),

    /// 배포 엔드포인트 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),

    /// 문서를 찾을 수 없음
    #[error("not found: {0}")]
    NotFound(String),
}

/// 사용량 텔레메트리 에러
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// 쿼리 실패
    #[error("query failed: {0}")]
    Query(String),

    /// 지원하지 않는 메트릭
    #[error("unsupported metric: {0}")]
    Unsupported(String),
}

/// 워크로드 에러
#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    /// 생성기 설정 오류
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),

    /// 연산 실행 실패
    #[error("operation failed: {0}")]
    Operation(String),

    /// 리플레이 로그 파싱 실패
    #[error("replay log error: {0}")]
    ReplayLog(String),
}

/// Elasticsearch 에러 응답을 `[status] type: reason` 형식으로 요약합니다.
///
/// 본문이 표준 에러 형식이 아니면 본문 원문을 사용합니다.
pub fn describe_es_error(status: u16, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    match error {
        Some(serde_json::Value::Object(obj)) => {
            let kind = obj.get("type").and_then(|t| t.as_str()).unwrap_or("unknown");
            let reason = obj
                .get("reason")
                .and_then(|r| r.as_str())
                .unwrap_or("no reason given");
            format!("[{status}] {kind}: {reason}")
        }
        Some(serde_json::Value::String(msg)) => format!("[{status}] {msg}"),
        _ => format!("[{status}] {}", body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn es_error_uses_type_and_reason() {
        let body = r#"{"error":{"type":"index_not_found_exception","reason":"no such index [foo]"},"status":404}"#;
        assert_eq!(
            describe_es_error(404, body),
            "[404] index_not_found_exception: no such index [foo]"
        );
    }

    #[test]
    fn es_error_falls_back_to_raw_body() {
        assert_eq!(describe_es_error(502, "Bad Gateway\n"), "[502] Bad Gateway");
        assert_eq!(
            describe_es_error(401, r#"{"error":"unauthorized"}"#),
            "[401] unauthorized"
        );
    }

    #[test]
    fn config_error_converts_to_golden_error() {
        let err: GoldenError = ConfigError::InvalidValue {
            field: "general.log_level".to_owned(),
            reason: "bad".to_owned(),
        }
        .into();
        assert!(matches!(err, GoldenError::Config(_)));
        assert!(err.to_string().contains("general.log_level"));
    }

    #[test]
    fn invalid_range_display_includes_bounds() {
        let err = ScenarioError::InvalidRange {
            metric: "data_out_gb".to_owned(),
            min: 5.0,
            max: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("data_out_gb"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err: GoldenError = io.into();
        assert!(matches!(err, GoldenError::Io(_)));
    }
}
