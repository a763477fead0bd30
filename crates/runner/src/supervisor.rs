//! 실행 중인 시나리오의 supervisor
//!
//! [`Supervisor`]는 활성 시나리오 하나의 백그라운드 루프 두 개를 소유합니다:
//!
//! ```text
//!              ┌── exercise loop ──> DataEndpoint (search / index)
//! Supervisor ──┤
//!              └── validation loop ──> Validator ──> StateStore
//! ```
//!
//! 루프마다 자체 [`CancellationToken`]을 가집니다. 취소하면 새 작업을 더 이상
//! 예약하지 않으며, exercise 루프의 진행 중 요청은 태스크와 함께 abort됩니다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use golden_core::metrics as m;
use golden_core::scenario::{Scenario, WorkloadSpec};
use golden_state::StateStore;
use golden_usage::UsageClient;
use golden_workload::{DataEndpoint, OpMix, OperationFactory, execute};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::validator::Validator;

/// 실행 중인 시나리오 하나의 백그라운드 루프
pub struct Supervisor {
    scenario_id: String,
    scenario: Arc<RwLock<Scenario>>,
    exercise_cancel: CancellationToken,
    validation_cancel: CancellationToken,
    exercise_task: JoinHandle<()>,
    validation_task: JoinHandle<()>,
}

impl Supervisor {
    /// `scenario`의 두 루프를 spawn합니다.
    ///
    /// `scenario`는 이미 시작 상태여야 합니다. `started_on`이 없으면 검증 일정은
    /// 실행 시각을 기준으로 잡힙니다.
    pub fn launch<U, S, E>(
        scenario: Scenario,
        endpoint: E,
        validator: Validator<U>,
        store: Arc<S>,
        factory: OperationFactory,
    ) -> Self
    where
        U: UsageClient,
        S: StateStore,
        E: DataEndpoint,
    {
        let scenario_id = scenario.id.clone();
        let workload = scenario.workload.clone();
        let scenario = Arc::new(RwLock::new(scenario));

        let exercise_cancel = CancellationToken::new();
        let validation_cancel = CancellationToken::new();

        let exercise_task = tokio::spawn(exercise_loop(
            scenario_id.clone(),
            workload,
            Arc::new(endpoint),
            factory,
            exercise_cancel.clone(),
        ));
        let validation_task = tokio::spawn(validation_loop(
            Arc::clone(&scenario),
            validator,
            store,
            validation_cancel.clone(),
        ));

        Self {
            scenario_id,
            scenario,
            exercise_cancel,
            validation_cancel,
            exercise_task,
            validation_task,
        }
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// 실행 이후 추가된 결과를 포함한 현재 메모리 상태
    pub async fn snapshot(&self) -> Scenario {
        self.scenario.read().await.clone()
    }

    /// 검증 루프와 공유하는 상태 핸들
    pub fn shared_state(&self) -> Arc<RwLock<Scenario>> {
        Arc::clone(&self.scenario)
    }

    /// 두 루프에 정지 신호를 보냅니다. 종료를 기다리지 않습니다.
    pub fn cancel(&self) {
        self.validation_cancel.cancel();
        self.exercise_cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.exercise_task.is_finished() && self.validation_task.is_finished()
    }

    /// 종료 시 drain하는 호출자를 위한 태스크 핸들
    pub fn into_handles(self) -> [JoinHandle<()>; 2] {
        [self.exercise_task, self.validation_task]
    }
}

/// 다음 배치까지의 대기 시간. 워크로드 간격 범위에서 균등 추출하며 최소 1초입니다.
fn next_gap<R: Rng + ?Sized>(workload: &WorkloadSpec, rng: &mut R) -> Duration {
    let secs = rng.gen_range(workload.min_interval_seconds..=workload.max_interval_seconds);
    Duration::from_secs(secs.max(1))
}

async fn exercise_loop<E: DataEndpoint>(
    scenario_id: String,
    workload: WorkloadSpec,
    endpoint: Arc<E>,
    factory: OperationFactory,
    cancel: CancellationToken,
) {
    let mix = OpMix::new(workload.index_to_search_ratio);
    let mut rng = StdRng::from_entropy();
    let loop_start = Instant::now();
    let start_at = loop_start + workload.start_offset();
    let mut in_flight: JoinSet<()> = JoinSet::new();
    let mut next_tick = loop_start + next_gap(&workload, &mut rng);

    info!(
        scenario_id = %scenario_id,
        start_offset_secs = workload.start_offset_seconds,
        max_requests_per_tick = workload.max_requests_per_tick,
        "exercise loop started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep_until(next_tick) => {}
        }
        let tick = next_tick;
        next_tick = tick + next_gap(&workload, &mut rng);

        // 끝난 요청은 회수 (set이 계속 커지지 않도록)
        while in_flight.try_join_next().is_some() {}

        if tick < start_at {
            continue;
        }

        let count = rng.gen_range(0..=workload.max_requests_per_tick);
        metrics::counter!(m::WORKLOAD_TICKS_TOTAL).increment(1);
        debug!(scenario_id = %scenario_id, count, "firing operations");

        for _ in 0..count {
            let operation = factory.draw(&mix, &mut rng);
            let endpoint = Arc::clone(&endpoint);
            let scenario_id = scenario_id.clone();
            in_flight.spawn(async move {
                let op = operation.op.as_str();
                metrics::counter!(m::WORKLOAD_OPERATIONS_TOTAL, m::LABEL_OP => op).increment(1);
                if let Err(e) = execute(endpoint.as_ref(), &operation).await {
                    metrics::counter!(m::WORKLOAD_OPERATION_FAILURES_TOTAL, m::LABEL_OP => op)
                        .increment(1);
                    warn!(scenario_id = %scenario_id, op, error = %e, "workload operation failed");
                }
            });
        }
    }

    in_flight.abort_all();
    info!(scenario_id = %scenario_id, "exercise loop stopped");
}

/// 첫 검증 시각: `now` 이후인 가장 작은 `started_on + k * frequency`
pub fn next_validation_at(
    started_on: DateTime<Utc>,
    frequency: Duration,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let Ok(elapsed) = (now - started_on).to_std() else {
        return started_on;
    };
    let step = frequency.as_nanos().max(1);
    let periods = elapsed.as_nanos().div_ceil(step);
    let offset = u64::try_from(periods * step)
        .map(Duration::from_nanos)
        .unwrap_or(Duration::MAX);
    TimeDelta::from_std(offset)
        .ok()
        .and_then(|delta| started_on.checked_add_signed(delta))
        .unwrap_or(now)
}

async fn validation_loop<U: UsageClient, S: StateStore>(
    scenario: Arc<RwLock<Scenario>>,
    validator: Validator<U>,
    store: Arc<S>,
    cancel: CancellationToken,
) {
    let (scenario_id, started_on, frequency) = {
        let s = scenario.read().await;
        (
            s.id.clone(),
            s.started_on.unwrap_or_else(Utc::now),
            s.validations.frequency(),
        )
    };

    let now = Utc::now();
    let first = next_validation_at(started_on, frequency, now);
    let delay = (first - now).to_std().unwrap_or_default();
    let mut ticker = interval_at(Instant::now() + delay, frequency);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        scenario_id = %scenario_id,
        first_run = %first,
        frequency_secs = frequency.as_secs(),
        "validation loop started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = run_validation(&scenario, &validator, store.as_ref()) => {}
        }
    }

    info!(scenario_id = %scenario_id, "validation loop stopped");
}

async fn run_validation<U: UsageClient, S: StateStore>(
    scenario: &RwLock<Scenario>,
    validator: &Validator<U>,
    store: &S,
) {
    let (scenario_id, cluster_ids, spec) = {
        let s = scenario.read().await;
        (s.id.clone(), s.cluster_ids.clone(), s.validations.clone())
    };

    info!(scenario_id = %scenario_id, "running validation");
    let result = validator
        .validate(&scenario_id, &cluster_ids, &spec, Utc::now())
        .await;
    info!(
        scenario_id = %scenario_id,
        all_valid = result.all_valid(),
        errors = result.error_count(),
        "validation finished"
    );

    scenario.write().await.append_result(result.clone());

    if let Err(e) = store.save_validation_result(&result).await {
        metrics::counter!(m::STATE_PERSIST_FAILURES_TOTAL).increment(1);
        warn!(scenario_id = %scenario_id, error = %e, "failed to persist validation result");
    }
}
