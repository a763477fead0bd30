//! 시나리오 실행 엔진
//!
//! - [`ScenarioRunner`]: 실행 중인 시나리오 레지스트리 (start / stop / drain)
//! - [`Supervisor`]: 시나리오 하나의 exercise 루프와 검증 루프
//! - [`Validator`]: 사용량 텔레메트리와 기대 범위의 메트릭별 비교

pub mod error;
pub mod runner;
pub mod supervisor;
pub mod validator;

pub use error::RunnerError;
pub use runner::{ResumeReport, ScenarioRunner};
pub use supervisor::{Supervisor, next_validation_at};
pub use validator::Validator;
