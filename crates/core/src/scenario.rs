//! 시나리오 모델: 배포 대상, 워크로드 프로파일, 검증 기대값
//!
//! [`Scenario`]는 실행 단위입니다. 외부 입력(JSON)은 [`Scenario::from_json`]으로
//! 파싱과 동시에 유효성 검증을 거칩니다.
//!
//! # 생명주기
//! ```text
//! Created → Bound(deployment) → Running → Stopped
//!                                  ^          |
//!                                  +----------+  (재시작)
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::validation::{FloatRange, UsageMetric, ValidationResult};

/// 배포 이름 접두어
pub const DEPLOYMENT_NAME_PREFIX: &str = "golden-";

/// 검증 주기 기본값 (1일)
pub const DEFAULT_VALIDATION_FREQUENCY_SECS: u64 = 24 * 60 * 60;

// ─── DeploymentTemplate / Credentials ────────────────────────────────

/// 배포 템플릿 참조와 변수 오버라이드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTemplate {
    /// 템플릿 ID (`{templates_dir}/{id}/setup/template.json`)
    pub id: String,
    /// 템플릿 변수 오버라이드
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, serde_json::Value>,
}

/// 프로비저닝된 배포의 접속 정보
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentCredentials {
    #[serde(default)]
    pub cloud_id: String,
    /// 데이터 엔드포인트 URL
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl DeploymentCredentials {
    /// 접속 정보가 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_empty() && self.cloud_id.is_empty()
    }
}

// 비밀번호가 로그에 남지 않도록 Debug를 직접 구현
impl fmt::Debug for DeploymentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentCredentials")
            .field("cloud_id", &self.cloud_id)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ─── WorkloadSpec ────────────────────────────────────────────────────

/// 합성 워크로드 프로파일
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadSpec {
    /// 시나리오 시작 후 워크로드 발생까지의 지연 (초)
    pub start_offset_seconds: u64,
    /// 배치 간 최소 간격 (초)
    pub min_interval_seconds: u64,
    /// 배치 간 최대 간격 (초)
    pub max_interval_seconds: u64,
    /// 배치당 최대 연산 수 (포함)
    pub max_requests_per_tick: u32,
    /// search 1회당 index 가중치
    pub index_to_search_ratio: u32,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            start_offset_seconds: 0,
            min_interval_seconds: 1,
            max_interval_seconds: 1,
            max_requests_per_tick: 0,
            index_to_search_ratio: 1,
        }
    }
}

impl WorkloadSpec {
    pub fn start_offset(&self) -> Duration {
        Duration::from_secs(self.start_offset_seconds)
    }

    /// 간격 설정을 검증합니다.
    ///
    /// `min_interval_seconds`는 0을 허용합니다. 실행 루프는 배치 간격을 최소 1초로 둡니다.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.min_interval_seconds > self.max_interval_seconds {
            return Err(ScenarioError::InvalidWorkload {
                field: "max_interval_seconds".to_owned(),
                reason: format!(
                    "must be >= min_interval_seconds ({})",
                    self.min_interval_seconds
                ),
            });
        }
        Ok(())
    }
}

// ─── TimeBound / TimeWindow ──────────────────────────────────────────

/// 검증 구간의 경계
///
/// 절대 시각(RFC 3339) 또는 `now`로 시작하는 상대 표현식(`now-1d/d` 등)입니다.
/// 상대 표현식은 텔레메트리 백엔드에서 해석됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeBound {
    Absolute(DateTime<Utc>),
    Relative(String),
}

impl TimeBound {
    /// 백엔드 쿼리에 사용할 문자열 표현
    pub fn as_query_value(&self) -> String {
        match self {
            Self::Absolute(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::Relative(expr) => expr.clone(),
        }
    }
}

impl TryFrom<String> for TimeBound {
    type Error = ScenarioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&value) {
            return Ok(Self::Absolute(ts.with_timezone(&Utc)));
        }
        if is_date_math(&value) {
            return Ok(Self::Relative(value));
        }
        Err(ScenarioError::InvalidTimeBound(value))
    }
}

impl From<TimeBound> for String {
    fn from(value: TimeBound) -> Self {
        value.as_query_value()
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query_value())
    }
}

/// `now`, `now-1d`, `now-7d/d`, `now+1h` 형태만 허용
fn is_date_math(expr: &str) -> bool {
    let Some(rest) = expr.strip_prefix("now") else {
        return false;
    };
    let units = ['y', 'M', 'w', 'd', 'h', 'H', 'm', 's'];
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '+' | '-' => {
                let mut digits = 0;
                while chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                    chars.next();
                    digits += 1;
                }
                if digits == 0 || !chars.next().is_some_and(|u| units.contains(&u)) {
                    return false;
                }
            }
            '/' => {
                if !chars.next().is_some_and(|u| units.contains(&u)) {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// 텔레메트리 조회 구간 `[start, end)`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub start: TimeBound,
    pub end: TimeBound,
}

// ─── ValidationSpec ──────────────────────────────────────────────────

/// 메트릭별 기대 범위
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectations {
    pub instance_capacity_gb_hours: FloatRange,
    pub data_out_gb: FloatRange,
    #[serde(rename = "data_internode_gb")]
    pub data_inter_node_gb: FloatRange,
    pub snapshot_storage_size_gb: FloatRange,
    pub snapshot_api_requests_count: FloatRange,
}

impl Expectations {
    pub fn get(&self, metric: UsageMetric) -> FloatRange {
        match metric {
            UsageMetric::InstanceCapacityGbHours => self.instance_capacity_gb_hours,
            UsageMetric::DataOutGb => self.data_out_gb,
            UsageMetric::DataInterNodeGb => self.data_inter_node_gb,
            UsageMetric::SnapshotStorageSizeGb => self.snapshot_storage_size_gb,
            UsageMetric::SnapshotApiRequestsCount => self.snapshot_api_requests_count,
        }
    }

    /// 모든 범위의 `min <= max` 불변식을 검사합니다.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for metric in UsageMetric::ALL {
            self.get(metric).validate(metric.as_str())?;
        }
        Ok(())
    }
}

fn default_frequency_seconds() -> u64 {
    DEFAULT_VALIDATION_FREQUENCY_SECS
}

/// 검증 주기, 조회 구간, 기대 범위
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSpec {
    /// 검증 실행 주기 (초)
    #[serde(default = "default_frequency_seconds")]
    pub frequency_seconds: u64,
    pub start_timestamp: TimeBound,
    pub end_timestamp: TimeBound,
    pub expectations: Expectations,
}

impl ValidationSpec {
    pub fn frequency(&self) -> Duration {
        Duration::from_secs(self.frequency_seconds)
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_timestamp.clone(),
            end: self.end_timestamp.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.frequency_seconds == 0 {
            return Err(ScenarioError::InvalidValidations {
                field: "frequency_seconds".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if let (TimeBound::Absolute(start), TimeBound::Absolute(end)) =
            (&self.start_timestamp, &self.end_timestamp)
        {
            if start >= end {
                return Err(ScenarioError::InvalidValidations {
                    field: "end_timestamp".to_owned(),
                    reason: "must be after start_timestamp".to_owned(),
                });
            }
        }
        self.expectations.validate()
    }
}

// ─── Scenario ────────────────────────────────────────────────────────

/// 배포 대상, 합성 워크로드, 검증 기대값을 묶은 실행 단위
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 불변 고유 ID (생성 시 한 번 할당)
    #[serde(default)]
    pub id: String,
    pub deployment_template: DeploymentTemplate,
    #[serde(default)]
    pub workload: WorkloadSpec,
    pub validations: ValidationSpec,
    /// 바인딩된 배포의 리소스 ID 목록
    #[serde(default)]
    pub cluster_ids: Vec<String>,
    #[serde(default)]
    pub deployment_credentials: DeploymentCredentials,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_on: Option<DateTime<Utc>>,
    /// 검증 결과 (추가만 가능)
    #[serde(default)]
    pub validation_results: Vec<ValidationResult>,
}

impl Scenario {
    /// JSON을 파싱하고 유효성을 검증합니다.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario =
            serde_json::from_str(json).map_err(|e| ScenarioError::Serialization(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// 새 ID를 할당합니다. 이미 ID가 있으면 에러를 반환합니다.
    pub fn generate_id(&mut self) -> Result<&str, ScenarioError> {
        if !self.id.is_empty() {
            return Err(ScenarioError::IdAlreadyAssigned(self.id.clone()));
        }
        self.id = uuid::Uuid::new_v4().to_string();
        Ok(&self.id)
    }

    /// 워크로드와 검증 설정을 검증합니다.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.deployment_template.id.is_empty() {
            return Err(ScenarioError::InvalidValidations {
                field: "deployment_template.id".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        self.workload.validate()?;
        self.validations.validate()
    }

    /// 결정적 배포 이름 (`golden-{id}`)
    pub fn deployment_name(&self) -> String {
        format!("{DEPLOYMENT_NAME_PREFIX}{}", self.id)
    }

    /// 배포가 바인딩되었는지 여부
    pub fn is_bound(&self) -> bool {
        !self.cluster_ids.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.started_on.is_some()
    }

    /// 실행 중으로 기록된 상태인지 (재시작 시 복구 대상)
    pub fn is_active(&self) -> bool {
        self.started_on.is_some() && self.stopped_on.is_none()
    }

    /// 배포 바인딩 결과를 기록합니다.
    pub fn bind_deployment(&mut self, cluster_ids: Vec<String>, credentials: DeploymentCredentials) {
        self.cluster_ids = cluster_ids;
        self.deployment_credentials = credentials;
    }

    /// 시작을 기록합니다. `started_on`은 최초 한 번만 설정됩니다.
    pub fn mark_started(&mut self, now: DateTime<Utc>) {
        if self.started_on.is_none() {
            self.started_on = Some(now);
        }
        self.stopped_on = None;
    }

    pub fn mark_stopped(&mut self, now: DateTime<Utc>) {
        self.stopped_on = Some(now);
    }

    pub fn append_result(&mut self, result: ValidationResult) {
        self.validation_results.push(result);
    }
}
