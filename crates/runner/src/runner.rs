//! 프로세스 전역 시나리오 레지스트리
//!
//! [`ScenarioRunner`]는 공유 협력자(텔레메트리 클라이언트, 상태 저장소, 배포
//! 프로비저너, 엔드포인트 커넥터)와 활성 시나리오마다 하나의 [`Supervisor`]를
//! 시나리오 ID로 관리합니다.
//!
//! 시나리오 상태 머신: `Created -> Bound -> Running -> Stopped`, 이후
//! [`start`](ScenarioRunner::start)로 `Stopped -> Running`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use golden_core::error::ScenarioError;
use golden_core::metrics as m;
use golden_core::scenario::Scenario;
use golden_core::validation::ValidationResult;
use golden_deployment::DeploymentProvisioner;
use golden_state::StateStore;
use golden_usage::UsageClient;
use golden_workload::{EndpointConnector, OperationFactory};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::RunnerError;
use crate::supervisor::Supervisor;
use crate::validator::Validator;

/// [`ScenarioRunner::resume_active`] 결과
#[derive(Debug, Default)]
pub struct ResumeReport {
    /// 다시 시작된 ID
    pub resumed: Vec<String>,
    /// 시작에 실패한 ID와 에러
    pub failed: Vec<(String, RunnerError)>,
}

/// 시나리오 실행 엔진
pub struct ScenarioRunner<U, S, P, C> {
    validator: Validator<U>,
    store: Arc<S>,
    provisioner: Arc<P>,
    connector: C,
    factory: OperationFactory,
    registry: Mutex<HashMap<String, Supervisor>>,
}

impl<U, S, P, C> ScenarioRunner<U, S, P, C>
where
    U: UsageClient,
    S: StateStore,
    P: DeploymentProvisioner,
    C: EndpointConnector,
{
    pub fn new(usage: Arc<U>, store: Arc<S>, provisioner: Arc<P>, connector: C) -> Self {
        Self {
            validator: Validator::new(usage),
            store,
            provisioner,
            connector,
            factory: OperationFactory::default(),
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// 기본 워크로드 대상을 교체합니다.
    pub fn with_operation_factory(mut self, factory: OperationFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// `scenario`를 활성화합니다.
    ///
    /// 바인딩되지 않았거나 바인딩된 배포가 사라졌으면 골든 배포를 확보하고,
    /// 엔드포인트에 연결한 뒤 시작 시각을 기록해 저장하고 두 루프를 띄웁니다.
    /// 에러가 나면 아무것도 등록되지 않고 루프도 실행되지 않습니다.
    ///
    /// 같은 ID로 등록된 supervisor는 취소 후 교체됩니다.
    pub async fn start(&self, scenario: Scenario) -> Result<(), RunnerError> {
        let scenario_id = scenario.id.clone();
        match self.try_start(scenario).await {
            Ok(()) => Ok(()),
            Err(e) => {
                metrics::counter!(m::RUNNER_START_FAILURES_TOTAL).increment(1);
                error!(scenario_id = %scenario_id, error = %e, "failed to start scenario");
                Err(e)
            }
        }
    }

    async fn try_start(&self, mut scenario: Scenario) -> Result<(), RunnerError> {
        if scenario.id.is_empty() {
            return Err(ScenarioError::MissingId.into());
        }
        scenario.validate()?;

        self.ensure_deployment(&mut scenario).await?;
        let endpoint = self.connector.connect(&scenario.deployment_credentials)?;

        scenario.mark_started(Utc::now());
        self.store.save_scenario(&scenario).await?;

        let scenario_id = scenario.id.clone();
        let supervisor = Supervisor::launch(
            scenario,
            endpoint,
            self.validator.clone(),
            Arc::clone(&self.store),
            self.factory.clone(),
        );

        let mut registry = self.registry.lock().await;
        if let Some(previous) = registry.insert(scenario_id.clone(), supervisor) {
            warn!(scenario_id = %scenario_id, "replacing running supervisor");
            previous.cancel();
        }
        metrics::gauge!(m::RUNNER_ACTIVE_SCENARIOS).set(registry.len() as f64);
        info!(scenario_id = %scenario_id, active = registry.len(), "scenario started");
        Ok(())
    }

    /// `scenario`를 골든 배포에 바인딩합니다. 필요하면 배포를 생성합니다.
    async fn ensure_deployment(&self, scenario: &mut Scenario) -> Result<(), RunnerError> {
        let name = scenario.deployment_name();

        if scenario.is_bound() {
            if self.provisioner.check_exists(&name).await?.is_some() {
                info!(scenario_id = %scenario.id, deployment = %name, "deployment already bound");
                return Ok(());
            }
            warn!(scenario_id = %scenario.id, deployment = %name, "bound deployment is gone, provisioning again");
        }

        let provisioned = self
            .provisioner
            .ensure_deployment(&name, &scenario.deployment_template)
            .await?;
        info!(
            scenario_id = %scenario.id,
            deployment = %name,
            deployment_id = %provisioned.deployment_id,
            clusters = provisioned.cluster_ids.len(),
            "deployment bound"
        );
        scenario.bind_deployment(provisioned.cluster_ids, provisioned.credentials);
        self.store.save_scenario(scenario).await?;
        Ok(())
    }

    /// `scenario_id`의 두 루프를 취소하고 등록을 해제한 뒤 `stopped_on`을 기록해 저장합니다.
    ///
    /// 등록되지 않은 ID면 `false`를 반환합니다. 루프 종료를 기다리지 않으며,
    /// 저장 실패는 로그만 남깁니다. 정지된 시나리오는 재시작 시 재개되지 않습니다.
    pub async fn stop(&self, scenario_id: &str) -> bool {
        let Some(supervisor) = self.deregister(scenario_id).await else {
            return false;
        };
        supervisor.cancel();

        let mut scenario = supervisor.snapshot().await;
        scenario.mark_stopped(Utc::now());
        if let Err(e) = self.store.save_scenario(&scenario).await {
            metrics::counter!(m::STATE_PERSIST_FAILURES_TOTAL).increment(1);
            warn!(scenario_id, error = %e, "failed to persist stopped scenario");
        }

        info!(scenario_id, "scenario stopped");
        true
    }

    async fn deregister(&self, scenario_id: &str) -> Option<Supervisor> {
        let mut registry = self.registry.lock().await;
        let supervisor = registry.remove(scenario_id)?;
        metrics::gauge!(m::RUNNER_ACTIVE_SCENARIOS).set(registry.len() as f64);
        Some(supervisor)
    }

    /// 등록된 모든 시나리오의 루프를 취소합니다. 정지한 개수를 반환합니다.
    ///
    /// 프로세스 종료용이므로 `stopped_on`은 기록하지 않습니다. 저장된 시나리오는
    /// 다음 기동 시 [`resume_active`](Self::resume_active)로 재개됩니다.
    pub async fn stop_all(&self) -> usize {
        let drained = self.drain().await;
        for supervisor in &drained {
            supervisor.cancel();
        }
        info!(stopped = drained.len(), "all scenarios stopped");
        drained.len()
    }

    /// [`stop_all`](Self::stop_all)처럼 취소한 뒤 루프 태스크가 끝날 때까지 기다립니다.
    ///
    /// # Errors
    ///
    /// `timeout` 안에 끝나지 않은 루프가 있으면 `RunnerError::ShutdownTimeout`을
    /// 반환하고 남은 태스크는 abort합니다.
    pub async fn stop_all_and_wait(&self, timeout: Duration) -> Result<(), RunnerError> {
        let drained = self.drain().await;
        let count = drained.len();
        let mut handles = Vec::with_capacity(count * 2);
        for supervisor in drained {
            supervisor.cancel();
            handles.extend(supervisor.into_handles());
        }

        let joined = tokio::time::timeout(timeout, async {
            for handle in &mut handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "scenario loop ended abnormally");
                }
            }
        })
        .await;

        if joined.is_err() {
            let remaining = handles.iter().filter(|h| !h.is_finished()).count();
            for handle in &handles {
                handle.abort();
            }
            return Err(RunnerError::ShutdownTimeout {
                remaining,
                timeout_secs: timeout.as_secs(),
            });
        }
        info!(stopped = count, "all scenario loops drained");
        Ok(())
    }

    async fn drain(&self) -> Vec<Supervisor> {
        let mut registry = self.registry.lock().await;
        let drained: Vec<Supervisor> = registry.drain().map(|(_, s)| s).collect();
        metrics::gauge!(m::RUNNER_ACTIVE_SCENARIOS).set(0.0);
        drained
    }

    pub async fn is_running(&self, scenario_id: &str) -> bool {
        self.registry.lock().await.contains_key(scenario_id)
    }

    /// 등록된 시나리오 ID (정렬됨)
    pub async fn running_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// 실행 중인 시나리오의 메모리 상태
    pub async fn running_scenario(&self, scenario_id: &str) -> Option<Scenario> {
        // 레지스트리 잠금은 상태를 읽기 전에 푼다
        let state = self.registry.lock().await.get(scenario_id)?.shared_state();
        let scenario = state.read().await.clone();
        Some(scenario)
    }

    /// 시작된 적 있고 정지되지 않은 저장 시나리오를 모두 다시 시작합니다.
    ///
    /// 실패는 모아서 반환하며 나머지 시나리오는 계속 시작합니다.
    pub async fn resume_active(&self) -> Result<ResumeReport, RunnerError> {
        let mut report = ResumeReport::default();
        for scenario in self.store.list_scenarios().await? {
            if !scenario.is_active() {
                continue;
            }
            let id = scenario.id.clone();
            match self.start(scenario).await {
                Ok(()) => report.resumed.push(id),
                Err(e) => report.failed.push((id, e)),
            }
        }
        info!(
            resumed = report.resumed.len(),
            failed = report.failed.len(),
            "active scenarios resumed"
        );
        Ok(report)
    }

    pub async fn list_scenarios(&self) -> Result<Vec<Scenario>, RunnerError> {
        Ok(self.store.list_scenarios().await?)
    }

    pub async fn get_scenario(&self, scenario_id: &str) -> Result<Scenario, RunnerError> {
        Ok(self.store.get_scenario(scenario_id).await?)
    }

    pub async fn list_validation_results(
        &self,
        scenario_id: &str,
    ) -> Result<Vec<ValidationResult>, RunnerError> {
        Ok(self
            .store
            .list_validation_results_for_scenario(scenario_id)
            .await?)
    }
}
