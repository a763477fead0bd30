//! Golden 공통 크레이트
//!
//! 골든 배포 과금 검증기의 모든 크레이트가 공유하는 도메인 모델입니다.
//!
//! - [`scenario`]: 시나리오 정의와 생명주기 상태
//! - [`validation`]: 기대 범위와 검증 결과
//! - [`config`]: `golden.toml` 설정
//! - [`error`]: 에러 계층
//! - [`metrics`]: Prometheus 메트릭 이름

pub mod config;
pub mod error;
pub mod metrics;
pub mod scenario;
pub mod validation;

// --- 주요 타입 re-export ---

// 에러
pub use error::{
    ConfigError, DeploymentError, GoldenError, ScenarioError, StorageError, TelemetryError,
    WorkloadError,
};

// 설정
pub use config::GoldenConfig;

// 시나리오
pub use scenario::{
    DeploymentCredentials, DeploymentTemplate, Expectations, Scenario, TimeBound, TimeWindow,
    ValidationSpec, WorkloadSpec,
};

// 검증
pub use validation::{FloatRange, FloatValidationResult, UsageMetric, ValidationResult};
