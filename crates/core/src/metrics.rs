//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `golden_`
//! - 컴포넌트명: `workload_`, `validation_`, `state_`, `runner_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(golden_core::metrics::WORKLOAD_OPERATIONS_TOTAL, "op" => "search").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 연산 종류 레이블 키 (search, index)
pub const LABEL_OP: &str = "op";

/// 사용량 메트릭 레이블 키 (data_out_gb 등)
pub const LABEL_METRIC: &str = "metric";

/// 결과 레이블 키 (valid, invalid, error)
pub const LABEL_RESULT: &str = "result";

// ─── Workload 메트릭 ───────────────────────────────────────────────

/// Workload: 실행된 연산 수 (counter, label: op)
pub const WORKLOAD_OPERATIONS_TOTAL: &str = "golden_workload_operations_total";

/// Workload: 실패한 연산 수 (counter, label: op)
pub const WORKLOAD_OPERATION_FAILURES_TOTAL: &str = "golden_workload_operation_failures_total";

/// Workload: 배치(tick) 수 (counter)
pub const WORKLOAD_TICKS_TOTAL: &str = "golden_workload_ticks_total";

// ─── Validation 메트릭 ─────────────────────────────────────────────

/// Validation: 검증 실행 수 (counter)
pub const VALIDATION_RUNS_TOTAL: &str = "golden_validation_runs_total";

/// Validation: 메트릭별 결과 수 (counter, labels: metric, result)
pub const VALIDATION_METRIC_RESULTS_TOTAL: &str = "golden_validation_metric_results_total";

/// Validation: 검증 실행 소요 시간 (histogram, 초)
pub const VALIDATION_DURATION_SECONDS: &str = "golden_validation_duration_seconds";

// ─── State 메트릭 ──────────────────────────────────────────────────

/// State: 백그라운드 저장 실패 수 (counter)
pub const STATE_PERSIST_FAILURES_TOTAL: &str = "golden_state_persist_failures_total";

// ─── Runner 메트릭 ─────────────────────────────────────────────────

/// Runner: 실행 중인 시나리오 수 (gauge)
pub const RUNNER_ACTIVE_SCENARIOS: &str = "golden_runner_active_scenarios";

/// Runner: 시작 실패 수 (counter)
pub const RUNNER_START_FAILURES_TOTAL: &str = "golden_runner_start_failures_total";

/// Daemon: 빌드 정보 (gauge, 항상 1, label: version)
pub const DAEMON_BUILD_INFO: &str = "golden_daemon_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 검증 소요 시간 히스토그램 버킷 (초)
///
/// 텔레메트리 쿼리 5회를 포함하므로 10ms ~ 120s 범위
pub const VALIDATION_DURATION_BUCKETS: [f64; 9] =
    [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 120.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 레코더가 설치되지 않은 상태에서 호출해도 안전합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Workload
    describe_counter!(
        WORKLOAD_OPERATIONS_TOTAL,
        "Workload operations dispatched against deployment endpoints"
    );
    describe_counter!(
        WORKLOAD_OPERATION_FAILURES_TOTAL,
        "Workload operations that returned an error"
    );
    describe_counter!(WORKLOAD_TICKS_TOTAL, "Exercise loop batches fired");

    // Validation
    describe_counter!(VALIDATION_RUNS_TOTAL, "Completed validation runs");
    describe_counter!(
        VALIDATION_METRIC_RESULTS_TOTAL,
        "Per-metric validation outcomes (valid, invalid, error)"
    );
    describe_histogram!(
        VALIDATION_DURATION_SECONDS,
        "Time spent querying telemetry for one validation run"
    );

    // State
    describe_counter!(
        STATE_PERSIST_FAILURES_TOTAL,
        "Scenario or result writes that failed in background loops"
    );

    // Runner / Daemon
    describe_gauge!(RUNNER_ACTIVE_SCENARIOS, "Scenarios currently running");
    describe_counter!(RUNNER_START_FAILURES_TOTAL, "Scenario starts that failed");
    describe_gauge!(DAEMON_BUILD_INFO, "Golden daemon build information");
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        WORKLOAD_OPERATIONS_TOTAL,
        WORKLOAD_OPERATION_FAILURES_TOTAL,
        WORKLOAD_TICKS_TOTAL,
        VALIDATION_RUNS_TOTAL,
        VALIDATION_METRIC_RESULTS_TOTAL,
        VALIDATION_DURATION_SECONDS,
        STATE_PERSIST_FAILURES_TOTAL,
        RUNNER_ACTIVE_SCENARIOS,
        RUNNER_START_FAILURES_TOTAL,
        DAEMON_BUILD_INFO,
    ];

    #[test]
    fn all_metrics_start_with_golden_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("golden_"),
                "Metric '{}' does not start with 'golden_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in ALL_METRIC_NAMES.iter().filter(|n| n.contains("_failures")) {
            assert!(name.ends_with("_total"), "{name}");
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_OP, LABEL_METRIC, LABEL_RESULT] {
            assert_eq!(label.to_lowercase(), label);
        }
    }

    #[test]
    fn validation_duration_buckets_are_sorted() {
        let buckets = VALIDATION_DURATION_BUCKETS;
        for i in 1..buckets.len() {
            assert!(buckets[i] > buckets[i - 1]);
        }
    }
}
