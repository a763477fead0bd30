//! 설정 관리: golden.toml 파싱 및 런타임 설정
//!
//! [`GoldenConfig`]는 모든 컴포넌트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`GOLDEN_USAGE_CLUSTER_URL=...` 형식)
//! 3. 설정 파일 (`golden.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), golden_core::error::GoldenError> {
//! use golden_core::config::GoldenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = GoldenConfig::load("golden.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = GoldenConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, GoldenError};
use crate::validation::UsageMetric;

/// Golden 통합 설정
///
/// `golden.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoldenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 배포 관리 API 설정
    #[serde(default)]
    pub api: ApiConfig,
    /// 사용량 텔레메트리 클러스터
    #[serde(default)]
    pub usage_cluster: ClusterConfig,
    /// 상태 저장 클러스터
    #[serde(default)]
    pub state_cluster: ClusterConfig,
    /// 메트릭별 사용량 조회 매핑
    #[serde(default)]
    pub usage: UsageConfig,
    /// 상태 저장소 설정
    #[serde(default)]
    pub state: StateConfig,
    /// 워크로드 대상 설정
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// 러너 설정
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Prometheus 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl GoldenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, GoldenError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, GoldenError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GoldenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                GoldenError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, GoldenError> {
        toml::from_str(toml_str).map_err(|e| {
            GoldenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `GOLDEN_{SECTION}_{FIELD}`
    /// 예: `GOLDEN_STATE_CLUSTER_PASSWORD=changeme`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "GOLDEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "GOLDEN_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.pid_file, "GOLDEN_GENERAL_PID_FILE");

        // API
        override_string(&mut self.api.url, "GOLDEN_API_URL");
        override_string(&mut self.api.key, "GOLDEN_API_KEY");
        override_string(&mut self.api.templates_dir, "GOLDEN_API_TEMPLATES_DIR");

        // Clusters
        self.usage_cluster.apply_env_overrides("GOLDEN_USAGE_CLUSTER");
        self.state_cluster.apply_env_overrides("GOLDEN_STATE_CLUSTER");

        // State
        override_string(
            &mut self.state.scenarios_index,
            "GOLDEN_STATE_SCENARIOS_INDEX",
        );
        override_string(
            &mut self.state.validation_results_index,
            "GOLDEN_STATE_VALIDATION_RESULTS_INDEX",
        );
        override_string(&mut self.state.backend, "GOLDEN_STATE_BACKEND");

        // Workload
        override_string(
            &mut self.workload.search_target,
            "GOLDEN_WORKLOAD_SEARCH_TARGET",
        );
        override_string(
            &mut self.workload.index_target,
            "GOLDEN_WORKLOAD_INDEX_TARGET",
        );

        // Runner
        override_u64(
            &mut self.runner.shutdown_timeout_secs,
            "GOLDEN_RUNNER_SHUTDOWN_TIMEOUT_SECS",
        );
        override_bool(
            &mut self.runner.resume_on_start,
            "GOLDEN_RUNNER_RESUME_ON_START",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "GOLDEN_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "GOLDEN_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "GOLDEN_METRICS_PORT");
        override_string(&mut self.metrics.endpoint, "GOLDEN_METRICS_ENDPOINT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), GoldenError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.usage_cluster.validate("usage_cluster")?;

        let valid_backends = ["elasticsearch", "memory"];
        if !valid_backends.contains(&self.state.backend.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "state.backend".to_owned(),
                reason: format!("must be one of: {}", valid_backends.join(", ")),
            }
            .into());
        }
        if self.state.backend == "elasticsearch" {
            self.state_cluster.validate("state_cluster")?;
            if self.state.scenarios_index.is_empty()
                || self.state.validation_results_index.is_empty()
            {
                return Err(ConfigError::InvalidValue {
                    field: "state.scenarios_index".to_owned(),
                    reason: "index names must not be empty".to_owned(),
                }
                .into());
            }
        }

        for (metric, source) in &self.usage.sources {
            if !UsageMetric::ALL.iter().any(|m| m.as_str() == metric) {
                return Err(ConfigError::InvalidValue {
                    field: format!("usage.sources.{metric}"),
                    reason: "unknown usage metric".to_owned(),
                }
                .into());
            }
            if source.index.is_empty() || source.id_field.is_empty() || source.value_field.is_empty()
            {
                return Err(ConfigError::InvalidValue {
                    field: format!("usage.sources.{metric}"),
                    reason: "index, id_field and value_field are required".to_owned(),
                }
                .into());
            }
        }

        if self.workload.search_target.is_empty() || self.workload.index_target.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "workload".to_owned(),
                reason: "search_target and index_target must not be empty".to_owned(),
            }
            .into());
        }

        if self.runner.shutdown_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "runner.shutdown_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.port".to_owned(),
                reason: "must be greater than 0 when metrics are enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// PID 파일 경로 (빈 문자열이면 생성하지 않음)
    pub pid_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            pid_file: String::new(),
        }
    }
}

/// 배포 관리 API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API 기본 URL
    pub url: String,
    /// API 키
    pub key: String,
    /// 배포 템플릿 루트 디렉토리
    pub templates_dir: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.elastic-cloud.com".to_owned(),
            key: String::new(),
            templates_dir: "deployment_templates".to_owned(),
        }
    }
}

/// Elasticsearch 클러스터 접속 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_owned(),
            username: "elastic".to_owned(),
            password: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl ClusterConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn apply_env_overrides(&mut self, prefix: &str) {
        override_string(&mut self.url, &format!("{prefix}_URL"));
        override_string(&mut self.username, &format!("{prefix}_USERNAME"));
        override_string(&mut self.password, &format!("{prefix}_PASSWORD"));
        override_u64(
            &mut self.request_timeout_secs,
            &format!("{prefix}_REQUEST_TIMEOUT_SECS"),
        );
    }

    fn validate(&self, section: &str) -> Result<(), GoldenError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: format!("{section}.url"),
                reason: "must start with http:// or https://".to_owned(),
            }
            .into());
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: format!("{section}.request_timeout_secs"),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }
        Ok(())
    }
}

/// 단일 메트릭의 집계 원천
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSource {
    /// 조회 대상 인덱스 패턴
    pub index: String,
    /// 클러스터 ID 필드 (terms 필터 대상)
    pub id_field: String,
    /// 합산할 값 필드
    pub value_field: String,
    /// 타임스탬프 필드
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,
    /// 추가 term 필터 (`field`, `value`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_type: Option<UsageTypeFilter>,
}

/// 사용량 유형 term 필터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTypeFilter {
    pub field: String,
    pub value: String,
}

fn default_timestamp_field() -> String {
    "@timestamp".to_owned()
}

/// 메트릭별 사용량 원천 매핑
///
/// 매핑되지 않은 메트릭은 조회 시 해당 메트릭만 에러로 기록됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// 메트릭 이름(`data_out_gb` 등) → 원천
    pub sources: BTreeMap<String, UsageSource>,
}

impl UsageConfig {
    /// 메트릭의 원천 매핑을 조회합니다.
    pub fn source_for(&self, metric: UsageMetric) -> Option<&UsageSource> {
        self.sources.get(metric.as_str())
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            UsageMetric::DataOutGb.as_str().to_owned(),
            UsageSource {
                index: "aggregations-proxy-metering-*".to_owned(),
                id_field: "cluster_id.keyword".to_owned(),
                value_field: "out.value".to_owned(),
                timestamp_field: default_timestamp_field(),
                usage_type: None,
            },
        );
        sources.insert(
            UsageMetric::DataInterNodeGb.as_str().to_owned(),
            UsageSource {
                index: "aggregations-data-transfer-*".to_owned(),
                id_field: "deployment_id.keyword".to_owned(),
                value_field: "out.value".to_owned(),
                timestamp_field: default_timestamp_field(),
                usage_type: None,
            },
        );
        sources.insert(
            UsageMetric::SnapshotApiRequestsCount.as_str().to_owned(),
            UsageSource {
                index: "usage-v*".to_owned(),
                id_field: "ece.source.cluster".to_owned(),
                value_field: "ece.usage.count".to_owned(),
                timestamp_field: default_timestamp_field(),
                usage_type: Some(UsageTypeFilter {
                    field: "ece.usage.type".to_owned(),
                    value: "storage_api".to_owned(),
                }),
            },
        );
        Self { sources }
    }
}

/// 상태 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// 시나리오 인덱스
    pub scenarios_index: String,
    /// 검증 결과 인덱스
    pub validation_results_index: String,
    /// 저장소 백엔드 (elasticsearch, memory)
    pub backend: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            scenarios_index: "golden-scenarios".to_owned(),
            validation_results_index: "golden-validation-results".to_owned(),
            backend: "elasticsearch".to_owned(),
        }
    }
}

/// 워크로드 대상 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// search 대상 인덱스 패턴
    pub search_target: String,
    /// index 대상 인덱스
    pub index_target: String,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            search_target: "foo*".to_owned(),
            index_target: "foo".to_owned(),
        }
    }
}

/// 러너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// 종료 시 루프 대기 시간 (초)
    pub shutdown_timeout_secs: u64,
    /// 시작 시 실행 중이던 시나리오 복구 여부
    pub resume_on_start: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: 30,
            resume_on_start: true,
        }
    }
}

impl RunnerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Prometheus 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수신 주소
    pub listen_addr: String,
    /// 수신 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9464,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = GoldenConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.state.backend, "elasticsearch");
        assert_eq!(config.workload.search_target, "foo*");
        assert_eq!(config.workload.index_target, "foo");
        assert!(config.runner.resume_on_start);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn default_config_passes_validation() {
        GoldenConfig::default().validate().unwrap();
    }

    #[test]
    fn default_usage_sources_leave_capacity_unmapped() {
        let config = GoldenConfig::default();
        assert!(config.usage.source_for(UsageMetric::DataOutGb).is_some());
        assert!(
            config
                .usage
                .source_for(UsageMetric::InstanceCapacityGbHours)
                .is_none()
        );
        let api = config
            .usage
            .source_for(UsageMetric::SnapshotApiRequestsCount)
            .unwrap();
        assert_eq!(api.usage_type.as_ref().unwrap().value, "storage_api");
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = GoldenConfig::parse("").unwrap();
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.state.scenarios_index, "golden-scenarios");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[state]
backend = "memory"
"#;
        let config = GoldenConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.state.backend, "memory");
        assert_eq!(
            config.state.validation_results_index,
            "golden-validation-results"
        );
    }

    #[test]
    fn usage_sources_parse_from_toml() {
        let toml = r#"
[usage.sources.instance_capacity_gb_hours]
index = "capacity-*"
id_field = "cluster.id"
value_field = "capacity.gb_hours"
"#;
        let config = GoldenConfig::parse(toml).unwrap();
        let source = config
            .usage
            .source_for(UsageMetric::InstanceCapacityGbHours)
            .unwrap();
        assert_eq!(source.index, "capacity-*");
        assert_eq!(source.timestamp_field, "@timestamp");
        assert!(source.usage_type.is_none());
        // 섹션을 지정하면 기본 매핑은 대체됨
        assert_eq!(config.usage.sources.len(), 1);
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let err = GoldenConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            GoldenError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = GoldenConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_unknown_backend() {
        let mut config = GoldenConfig::default();
        config.state.backend = "postgres".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("state.backend"));
    }

    #[test]
    fn validate_skips_state_cluster_for_memory_backend() {
        let mut config = GoldenConfig::default();
        config.state.backend = "memory".to_owned();
        config.state_cluster.url = "not-a-url".to_owned();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_cluster_url() {
        let mut config = GoldenConfig::default();
        config.usage_cluster.url = "localhost:9200".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("usage_cluster.url"));
    }

    #[test]
    fn validate_rejects_unknown_usage_metric() {
        let toml = r#"
[usage.sources.cpu_seconds]
index = "x"
id_field = "y"
value_field = "z"
"#;
        let config = GoldenConfig::parse(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cpu_seconds"));
    }

    #[test]
    fn validate_rejects_zero_shutdown_timeout() {
        let mut config = GoldenConfig::default();
        config.runner.shutdown_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_usage_source_fields() {
        let mut config = GoldenConfig::default();
        if let Some(source) = config.usage.sources.get_mut("data_out_gb") {
            source.value_field.clear();
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("usage.sources.data_out_gb"));
    }

    #[test]
    #[serial]
    fn env_override_cluster_fields() {
        let mut config = GoldenConfig::default();
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe {
            std::env::set_var("GOLDEN_STATE_CLUSTER_PASSWORD", "s3cret");
            std::env::set_var("GOLDEN_STATE_CLUSTER_REQUEST_TIMEOUT_SECS", "5");
        }
        config.apply_env_overrides();
        assert_eq!(config.state_cluster.password, "s3cret");
        assert_eq!(config.state_cluster.request_timeout_secs, 5);
        assert_eq!(config.usage_cluster.password, "");
        unsafe {
            std::env::remove_var("GOLDEN_STATE_CLUSTER_PASSWORD");
            std::env::remove_var("GOLDEN_STATE_CLUSTER_REQUEST_TIMEOUT_SECS");
        }
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
        unsafe { std::env::set_var("TEST_GOLDEN_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_GOLDEN_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_GOLDEN_BOOL_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_GOLDEN_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = GoldenConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = GoldenConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.usage.sources, parsed.usage.sources);
        assert_eq!(config.metrics.port, parsed.metrics.port);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = GoldenConfig::from_file("/nonexistent/path/golden.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GoldenError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
