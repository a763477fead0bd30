//! 프로세스 내 상태 저장소
//!
//! 테스트와 `state.backend = "memory"`일 때 데몬이 사용합니다. 재시작하면
//! 아무것도 남지 않습니다.

use std::collections::BTreeMap;

use golden_core::scenario::Scenario;
use golden_core::validation::ValidationResult;
use tokio::sync::RwLock;

use crate::error::StateError;
use crate::store::{StateStore, ensure_scenario_id, sort_results, without_results};

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    scenarios: RwLock<BTreeMap<String, Scenario>>,
    results: RwLock<BTreeMap<String, Vec<ValidationResult>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn attach_results(&self, mut scenario: Scenario) -> Scenario {
        let results = self.results.read().await;
        scenario.validation_results = results.get(&scenario.id).cloned().unwrap_or_default();
        sort_results(&mut scenario.validation_results);
        scenario
    }
}

impl StateStore for MemoryStateStore {
    async fn save_scenario(&self, scenario: &Scenario) -> Result<(), StateError> {
        ensure_scenario_id(scenario)?;
        self.scenarios
            .write()
            .await
            .insert(scenario.id.clone(), without_results(scenario));
        Ok(())
    }

    async fn get_scenario(&self, id: &str) -> Result<Scenario, StateError> {
        let stored = self
            .scenarios
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StateError::NotFound(id.to_owned()))?;
        Ok(self.attach_results(stored).await)
    }

    async fn list_scenarios(&self) -> Result<Vec<Scenario>, StateError> {
        let stored: Vec<Scenario> = self.scenarios.read().await.values().cloned().collect();
        let mut scenarios = Vec::with_capacity(stored.len());
        for scenario in stored {
            scenarios.push(self.attach_results(scenario).await);
        }
        Ok(scenarios)
    }

    async fn save_validation_result(&self, result: &ValidationResult) -> Result<(), StateError> {
        if result.scenario_id.is_empty() {
            return Err(StateError::Invalid(
                "validation result has no scenario_id".to_owned(),
            ));
        }
        self.results
            .write()
            .await
            .entry(result.scenario_id.clone())
            .or_default()
            .push(result.clone());
        Ok(())
    }

    async fn list_validation_results_for_scenario(
        &self,
        scenario_id: &str,
    ) -> Result<Vec<ValidationResult>, StateError> {
        let mut results = self
            .results
            .read()
            .await
            .get(scenario_id)
            .cloned()
            .unwrap_or_default();
        sort_results(&mut results);
        Ok(results)
    }
}
