//! 검증 타입: 기대 범위, 메트릭별 검증 결과
//!
//! [`ValidationResult`]는 한 번의 검증 실행 결과이며,
//! 추가된 이후에는 변경되지 않습니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

// ─── UsageMetric ─────────────────────────────────────────────────────

/// 추적 대상 사용량 메트릭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageMetric {
    /// 인스턴스 용량 (GB-시간)
    #[serde(rename = "instance_capacity_gb_hours")]
    InstanceCapacityGbHours,
    /// 외부 전송량 (GB)
    #[serde(rename = "data_out_gb")]
    DataOutGb,
    /// 노드 간 전송량 (GB)
    #[serde(rename = "data_internode_gb")]
    DataInterNodeGb,
    /// 스냅샷 저장 용량 (GB)
    #[serde(rename = "snapshot_storage_size_gb")]
    SnapshotStorageSizeGb,
    /// 스냅샷 API 요청 수
    #[serde(rename = "snapshot_api_requests_count")]
    SnapshotApiRequestsCount,
}

impl UsageMetric {
    /// 모든 추적 메트릭 (검증 순서)
    pub const ALL: [UsageMetric; 5] = [
        UsageMetric::InstanceCapacityGbHours,
        UsageMetric::DataOutGb,
        UsageMetric::DataInterNodeGb,
        UsageMetric::SnapshotStorageSizeGb,
        UsageMetric::SnapshotApiRequestsCount,
    ];

    /// 직렬화 필드명과 동일한 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstanceCapacityGbHours => "instance_capacity_gb_hours",
            Self::DataOutGb => "data_out_gb",
            Self::DataInterNodeGb => "data_internode_gb",
            Self::SnapshotStorageSizeGb => "snapshot_storage_size_gb",
            Self::SnapshotApiRequestsCount => "snapshot_api_requests_count",
        }
    }
}

impl fmt::Display for UsageMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── FloatRange ──────────────────────────────────────────────────────

/// 양 끝을 포함하는 실수 범위 `[min, max]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// 하한 (포함)
    pub min: f64,
    /// 상한 (포함)
    pub max: f64,
}

impl FloatRange {
    /// 범위를 생성합니다. `min > max`이거나 NaN이면 에러를 반환합니다.
    pub fn new(min: f64, max: f64) -> Result<Self, ScenarioError> {
        let range = Self { min, max };
        range.validate("range")?;
        Ok(range)
    }

    /// `min <= actual <= max` 여부
    pub fn is_in_range(&self, actual: f64) -> bool {
        self.min <= actual && actual <= self.max
    }

    /// 범위 불변식(`min <= max`)을 검사합니다.
    pub fn validate(&self, metric: &str) -> Result<(), ScenarioError> {
        if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
            return Err(ScenarioError::InvalidRange {
                metric: metric.to_owned(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for FloatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

// ─── FloatValidationResult ───────────────────────────────────────────

/// 단일 메트릭의 검증 결과
///
/// 조회에 실패한 경우 `error`만 채워지고 나머지는 기본값입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloatValidationResult {
    /// 기대 범위 내 여부
    pub is_valid: bool,
    /// 실제 조회 값
    pub actual: f64,
    /// 기대 범위
    pub expected: FloatRange,
    /// 조회 실패 사유
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FloatValidationResult {
    /// 조회 성공 결과를 생성합니다.
    pub fn measured(actual: f64, expected: FloatRange) -> Self {
        Self {
            is_valid: expected.is_in_range(actual),
            actual,
            expected,
            error: None,
        }
    }

    /// 조회 실패 결과를 생성합니다.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

// ─── ValidationResult ────────────────────────────────────────────────

/// 한 번의 검증 실행 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// 대상 시나리오 ID
    pub scenario_id: String,
    /// 검증 실행 시각
    pub validated_on: DateTime<Utc>,

    pub instance_capacity_gb_hours: FloatValidationResult,
    pub data_out_gb: FloatValidationResult,
    #[serde(rename = "data_internode_gb")]
    pub data_inter_node_gb: FloatValidationResult,
    pub snapshot_storage_size_gb: FloatValidationResult,
    pub snapshot_api_requests_count: FloatValidationResult,
}

impl ValidationResult {
    /// 빈 결과를 생성합니다.
    pub fn new(scenario_id: impl Into<String>, validated_on: DateTime<Utc>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            validated_on,
            instance_capacity_gb_hours: FloatValidationResult::default(),
            data_out_gb: FloatValidationResult::default(),
            data_inter_node_gb: FloatValidationResult::default(),
            snapshot_storage_size_gb: FloatValidationResult::default(),
            snapshot_api_requests_count: FloatValidationResult::default(),
        }
    }

    pub fn get(&self, metric: UsageMetric) -> &FloatValidationResult {
        match metric {
            UsageMetric::InstanceCapacityGbHours => &self.instance_capacity_gb_hours,
            UsageMetric::DataOutGb => &self.data_out_gb,
            UsageMetric::DataInterNodeGb => &self.data_inter_node_gb,
            UsageMetric::SnapshotStorageSizeGb => &self.snapshot_storage_size_gb,
            UsageMetric::SnapshotApiRequestsCount => &self.snapshot_api_requests_count,
        }
    }

    pub fn get_mut(&mut self, metric: UsageMetric) -> &mut FloatValidationResult {
        match metric {
            UsageMetric::InstanceCapacityGbHours => &mut self.instance_capacity_gb_hours,
            UsageMetric::DataOutGb => &mut self.data_out_gb,
            UsageMetric::DataInterNodeGb => &mut self.data_inter_node_gb,
            UsageMetric::SnapshotStorageSizeGb => &mut self.snapshot_storage_size_gb,
            UsageMetric::SnapshotApiRequestsCount => &mut self.snapshot_api_requests_count,
        }
    }

    /// 모든 메트릭이 기대 범위 내인지 여부
    pub fn all_valid(&self) -> bool {
        UsageMetric::ALL.iter().all(|m| self.get(*m).is_valid)
    }

    /// 조회에 실패한 메트릭 수
    pub fn error_count(&self) -> usize {
        UsageMetric::ALL
            .iter()
            .filter(|m| self.get(**m).error.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let range = FloatRange::new(1.0, 2.0).unwrap();
        assert!(range.is_in_range(1.0));
        assert!(range.is_in_range(2.0));
        assert!(range.is_in_range(1.5));
        assert!(!range.is_in_range(0.999));
        assert!(!range.is_in_range(2.001));
    }

    #[test]
    fn range_rejects_min_greater_than_max() {
        assert!(FloatRange::new(3.0, 1.0).is_err());
        assert!(FloatRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn degenerate_range_accepts_single_point() {
        let range = FloatRange::new(0.0, 0.0).unwrap();
        assert!(range.is_in_range(0.0));
        assert!(!range.is_in_range(0.1));
    }

    #[test]
    fn measured_result_sets_validity() {
        let expected = FloatRange { min: 0.0, max: 10.0 };
        let ok = FloatValidationResult::measured(10.0, expected);
        assert!(ok.is_valid);
        assert!(ok.error.is_none());

        let bad = FloatValidationResult::measured(11.0, expected);
        assert!(!bad.is_valid);
        assert_eq!(bad.actual, 11.0);
    }

    #[test]
    fn failed_result_only_carries_error() {
        let r = FloatValidationResult::failed("timeout");
        assert!(!r.is_valid);
        assert_eq!(r.error.as_deref(), Some("timeout"));
        assert_eq!(r.expected, FloatRange::default());
    }

    #[test]
    fn metric_names_match_json_fields() {
        let result = ValidationResult::new("s-1", Utc::now());
        let value = serde_json::to_value(&result).unwrap();
        for metric in UsageMetric::ALL {
            assert!(
                value.get(metric.as_str()).is_some(),
                "missing field {metric}"
            );
        }
    }

    #[test]
    fn error_count_counts_failed_metrics() {
        let mut result = ValidationResult::new("s-1", Utc::now());
        *result.get_mut(UsageMetric::DataOutGb) = FloatValidationResult::failed("boom");
        assert_eq!(result.error_count(), 1);
        assert!(!result.all_valid());
    }

    proptest! {
        #[test]
        fn in_range_iff_between_bounds(a in -1e6f64..1e6, b in -1e6f64..1e6, x in -2e6f64..2e6) {
            let (min, max) = if a <= b { (a, b) } else { (b, a) };
            let range = FloatRange::new(min, max).unwrap();
            prop_assert_eq!(range.is_in_range(x), min <= x && x <= max);
            prop_assert!(range.is_in_range(min));
            prop_assert!(range.is_in_range(max));
        }
    }
}
