//! 상태 저장소 추상화
//!
//! 시나리오와 검증 결과는 따로 저장합니다. 시나리오 레코드에는
//! `validation_results`를 저장하지 않으며, 읽을 때 해당 시나리오의 결과를
//! `validated_on` 순으로 붙입니다.

use std::future::Future;

use golden_core::scenario::Scenario;
use golden_core::validation::ValidationResult;

use crate::error::StateError;

/// 시나리오와 검증 결과 영속화
pub trait StateStore: Send + Sync + 'static {
    /// ID 기준으로 시나리오를 upsert합니다. 붙어 있는 검증 결과는 쓰지 않습니다.
    fn save_scenario(&self, scenario: &Scenario)
    -> impl Future<Output = Result<(), StateError>> + Send;

    /// 시나리오 하나를 검증 결과와 함께 읽습니다.
    ///
    /// # Errors
    ///
    /// 해당 ID의 시나리오가 없으면 `StateError::NotFound`를 반환합니다.
    fn get_scenario(&self, id: &str) -> impl Future<Output = Result<Scenario, StateError>> + Send;

    /// 저장된 모든 시나리오를 검증 결과와 함께 읽습니다.
    fn list_scenarios(&self) -> impl Future<Output = Result<Vec<Scenario>, StateError>> + Send;

    /// 검증 결과 하나를 추가합니다.
    fn save_validation_result(
        &self,
        result: &ValidationResult,
    ) -> impl Future<Output = Result<(), StateError>> + Send;

    /// `scenario_id`에 기록된 결과 (오래된 순)
    fn list_validation_results_for_scenario(
        &self,
        scenario_id: &str,
    ) -> impl Future<Output = Result<Vec<ValidationResult>, StateError>> + Send;
}

/// 키를 만들 수 없는 레코드를 거부합니다.
pub(crate) fn ensure_scenario_id(scenario: &Scenario) -> Result<(), StateError> {
    if scenario.id.is_empty() {
        return Err(StateError::Invalid("scenario has no id".to_owned()));
    }
    Ok(())
}

/// 결과를 뺀 저장용 시나리오
pub(crate) fn without_results(scenario: &Scenario) -> Scenario {
    Scenario {
        validation_results: Vec::new(),
        ..scenario.clone()
    }
}

pub(crate) fn sort_results(results: &mut [ValidationResult]) {
    results.sort_by_key(|r| r.validated_on);
}
