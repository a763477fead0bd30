//! `[state] backend`에 따른 저장소 선택

use golden_core::config::GoldenConfig;
use golden_core::scenario::Scenario;
use golden_core::validation::ValidationResult;

use crate::elasticsearch::EsStateStore;
use crate::error::StateError;
use crate::memory::MemoryStateStore;
use crate::store::StateStore;

/// 설정이 지정한 저장소
#[derive(Debug)]
pub enum ConfiguredStore {
    Elasticsearch(EsStateStore),
    Memory(MemoryStateStore),
}

impl ConfiguredStore {
    /// 설정된 백엔드를 생성합니다. Elasticsearch 인덱스가 없으면 만듭니다.
    pub async fn open(config: &GoldenConfig) -> Result<Self, StateError> {
        match config.state.backend.as_str() {
            "elasticsearch" => {
                let store = EsStateStore::connect(&config.state_cluster, &config.state)?;
                store.initialize().await?;
                Ok(Self::Elasticsearch(store))
            }
            "memory" => Ok(Self::Memory(MemoryStateStore::new())),
            other => Err(StateError::Config(format!("unknown state backend '{other}'"))),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Elasticsearch(_) => "elasticsearch",
            Self::Memory(_) => "memory",
        }
    }
}

impl StateStore for ConfiguredStore {
    async fn save_scenario(&self, scenario: &Scenario) -> Result<(), StateError> {
        match self {
            Self::Elasticsearch(s) => s.save_scenario(scenario).await,
            Self::Memory(s) => s.save_scenario(scenario).await,
        }
    }

    async fn get_scenario(&self, id: &str) -> Result<Scenario, StateError> {
        match self {
            Self::Elasticsearch(s) => s.get_scenario(id).await,
            Self::Memory(s) => s.get_scenario(id).await,
        }
    }

    async fn list_scenarios(&self) -> Result<Vec<Scenario>, StateError> {
        match self {
            Self::Elasticsearch(s) => s.list_scenarios().await,
            Self::Memory(s) => s.list_scenarios().await,
        }
    }

    async fn save_validation_result(&self, result: &ValidationResult) -> Result<(), StateError> {
        match self {
            Self::Elasticsearch(s) => s.save_validation_result(result).await,
            Self::Memory(s) => s.save_validation_result(result).await,
        }
    }

    async fn list_validation_results_for_scenario(
        &self,
        scenario_id: &str,
    ) -> Result<Vec<ValidationResult>, StateError> {
        match self {
            Self::Elasticsearch(s) => s.list_validation_results_for_scenario(scenario_id).await,
            Self::Memory(s) => s.list_validation_results_for_scenario(scenario_id).await,
        }
    }
}
