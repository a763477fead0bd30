//! golden.toml 통합 설정 테스트
//!
//! - golden.toml.example 파싱
//! - 부분 설정 로딩
//! - 환경변수 우선순위
//! - 잘못된 형식 / 값 에러

use golden_core::config::GoldenConfig;
use golden_core::error::{ConfigError, GoldenError};
use golden_core::validation::UsageMetric;

// =============================================================================
// golden.toml.example
// =============================================================================

#[test]
fn example_config_parses_and_validates() {
    let content = include_str!("../../../golden.toml.example");
    let config = GoldenConfig::parse(content).expect("example config should parse");
    config
        .validate()
        .expect("example config should pass validation");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.pid_file, "/var/run/golden/golden.pid");
    assert_eq!(config.state.backend, "elasticsearch");
    assert!(config.metrics.enabled);
}

#[test]
fn example_config_maps_every_metric() {
    let content = include_str!("../../../golden.toml.example");
    let config = GoldenConfig::parse(content).expect("should parse");

    for metric in UsageMetric::ALL {
        assert!(
            config.usage.source_for(metric).is_some(),
            "{metric} should have a usage source"
        );
    }
    let api_requests = config
        .usage
        .source_for(UsageMetric::SnapshotApiRequestsCount)
        .unwrap();
    assert_eq!(
        api_requests.usage_type.as_ref().map(|t| t.value.as_str()),
        Some("storage_api")
    );
    assert_eq!(api_requests.timestamp_field, "@timestamp");
}

// =============================================================================
// 부분 설정
// =============================================================================

#[test]
fn empty_file_uses_defaults() {
    let config = GoldenConfig::parse("").expect("empty config should parse");
    config.validate().expect("defaults should be valid");

    assert_eq!(config.state.scenarios_index, "golden-scenarios");
    assert_eq!(config.runner.shutdown_timeout_secs, 30);
    assert!(config.runner.resume_on_start);
    assert!(!config.metrics.enabled);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = GoldenConfig::parse(
        r#"
[runner]
resume_on_start = false
"#,
    )
    .expect("should parse");

    assert!(!config.runner.resume_on_start);
    assert_eq!(config.runner.shutdown_timeout_secs, 30);
    assert_eq!(config.workload.index_target, "foo");
}

#[tokio::test]
async fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = GoldenConfig::load(dir.path().join("golden.toml"))
        .await
        .expect_err("missing file must fail");
    assert!(matches!(
        err,
        GoldenError::Config(ConfigError::FileNotFound { .. })
    ));
}

// =============================================================================
// 에러
// =============================================================================

#[test]
fn malformed_toml_is_parse_error() {
    let err = GoldenConfig::parse("[general\nlog_level = 1").expect_err("must fail");
    assert!(matches!(
        err,
        GoldenError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn unknown_usage_metric_is_rejected() {
    let config = GoldenConfig::parse(
        r#"
[usage.sources.cpu_seconds]
index = "usage-*"
id_field = "id"
value_field = "v"
"#,
    )
    .expect("should parse");

    let err = config.validate().expect_err("unknown metric");
    assert!(err.to_string().contains("usage.sources.cpu_seconds"));
}

#[test]
fn cluster_url_must_be_http() {
    let config = GoldenConfig::parse(
        r#"
[usage_cluster]
url = "localhost:9200"
"#,
    )
    .expect("should parse");

    let err = config.validate().expect_err("scheme required");
    assert!(err.to_string().contains("usage_cluster.url"));
}

#[test]
fn memory_backend_skips_state_cluster_checks() {
    let config = GoldenConfig::parse(
        r#"
[state_cluster]
url = "not-a-url"

[state]
backend = "memory"
"#,
    )
    .expect("should parse");

    config.validate().expect("state cluster unused with memory backend");
}

// =============================================================================
// 환경변수 우선순위
// =============================================================================

fn with_env<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
    let original = std::env::var(key).ok();
    // SAFETY: serial_test로 직렬화된 테스트에서만 호출합니다.
    unsafe {
        std::env::set_var(key, value);
    }
    let result = f();
    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }
    result
}

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[state_cluster]
password = "from-file"
"#;
    let password = with_env("GOLDEN_STATE_CLUSTER_PASSWORD", "from-env", || {
        let mut config = GoldenConfig::parse(toml).expect("should parse");
        config.apply_env_overrides();
        config.state_cluster.password
    });
    assert_eq!(password, "from-env");
}

#[test]
#[serial_test::serial]
fn env_override_bool_and_numbers() {
    let (resume, timeout) = with_env("GOLDEN_RUNNER_RESUME_ON_START", "false", || {
        with_env("GOLDEN_RUNNER_SHUTDOWN_TIMEOUT_SECS", "90", || {
            let mut config = GoldenConfig::parse("").expect("should parse");
            config.apply_env_overrides();
            (config.runner.resume_on_start, config.runner.shutdown_timeout_secs)
        })
    });
    assert!(!resume);
    assert_eq!(timeout, 90);
}

#[test]
#[serial_test::serial]
fn invalid_env_value_is_ignored() {
    let port = with_env("GOLDEN_METRICS_PORT", "not-a-port", || {
        let mut config = GoldenConfig::parse("").expect("should parse");
        config.apply_env_overrides();
        config.metrics.port
    });
    assert_eq!(port, 9464);
}
