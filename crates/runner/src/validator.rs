//! 시나리오 검증 1회 실행
//!
//! 추적 메트릭마다 개별 조회합니다. 조회가 실패하면 해당 메트릭에만 에러를
//! 기록하고 나머지 메트릭은 계속 평가합니다.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use golden_core::metrics as m;
use golden_core::scenario::ValidationSpec;
use golden_core::validation::{FloatValidationResult, UsageMetric, ValidationResult};
use golden_usage::{UsageClient, UsageQuery};
use tracing::{debug, warn};

/// 텔레메트리 집계값을 시나리오 기대 범위와 비교합니다.
#[derive(Debug)]
pub struct Validator<U> {
    usage: Arc<U>,
}

impl<U> Clone for Validator<U> {
    fn clone(&self) -> Self {
        Self {
            usage: Arc::clone(&self.usage),
        }
    }
}

impl<U: UsageClient> Validator<U> {
    pub fn new(usage: Arc<U>) -> Self {
        Self { usage }
    }

    /// 설정된 검증 구간에 대해 `cluster_ids`의 검증을 한 번 실행합니다.
    ///
    /// 실패하지 않습니다. 조회 에러는 메트릭별 항목에 담깁니다.
    pub async fn validate(
        &self,
        scenario_id: &str,
        cluster_ids: &[String],
        spec: &ValidationSpec,
        validated_on: DateTime<Utc>,
    ) -> ValidationResult {
        let started = Instant::now();
        let query = UsageQuery::new(cluster_ids.to_vec(), spec.window());
        let mut result = ValidationResult::new(scenario_id, validated_on);

        for metric in UsageMetric::ALL {
            let entry = match self.usage.query(metric, &query).await {
                Ok(actual) => {
                    let entry = FloatValidationResult::measured(actual, spec.expectations.get(metric));
                    debug!(
                        scenario_id,
                        metric = %metric,
                        actual,
                        expected = %entry.expected,
                        is_valid = entry.is_valid,
                        "metric evaluated"
                    );
                    entry
                }
                Err(e) => {
                    warn!(scenario_id, metric = %metric, error = %e, "usage query failed");
                    FloatValidationResult::failed(e.to_string())
                }
            };

            let outcome = match (&entry.error, entry.is_valid) {
                (Some(_), _) => "error",
                (None, true) => "valid",
                (None, false) => "invalid",
            };
            metrics::counter!(
                m::VALIDATION_METRIC_RESULTS_TOTAL,
                m::LABEL_METRIC => metric.as_str(),
                m::LABEL_RESULT => outcome
            )
            .increment(1);

            *result.get_mut(metric) = entry;
        }

        metrics::counter!(m::VALIDATION_RUNS_TOTAL).increment(1);
        metrics::histogram!(m::VALIDATION_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        result
    }
}
