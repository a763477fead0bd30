//! 생성된 워크로드 로그를 데이터 엔드포인트에 재생합니다.
//!
//! 레코드는 오프셋별로 묶입니다. 1초 클록이 경과한 초마다 해당 묶음을 꺼내
//! 실행하며, 모든 묶음을 실행하면 재생이 끝납니다.

use std::collections::BTreeMap;

use tokio::time::{Duration, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::endpoint::{DataEndpoint, execute};
use crate::error::EmitterError;
use crate::generator::LogRecord;
use crate::operation::Operation;

/// 초 단위 오프셋을 키로 하는 파싱된 워크로드 로그
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayLog {
    entries: BTreeMap<u64, Vec<Operation>>,
}

impl ReplayLog {
    /// JSON lines를 파싱합니다. 빈 줄은 건너뜁니다.
    pub fn parse(raw: &str) -> Result<Self, EmitterError> {
        let mut entries: BTreeMap<u64, Vec<Operation>> = BTreeMap::new();
        for (idx, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: LogRecord =
                serde_json::from_str(line).map_err(|e| EmitterError::ReplayLog {
                    line: idx + 1,
                    reason: e.to_string(),
                })?;
            entries
                .entry(record.offset)
                .or_default()
                .push(record.operation);
        }
        Ok(Self { entries })
    }

    /// `offset`에 예약된 요청을 꺼내 반환합니다.
    pub fn pop_at(&mut self, offset: u64) -> Vec<Operation> {
        self.entries.remove(&offset).unwrap_or_default()
    }

    /// 남은 서로 다른 오프셋 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 남은 요청 총수
    pub fn operation_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// 재생 결과
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// 보낸 요청 수
    pub executed: usize,
    /// 실행 순서대로의 실패
    pub errors: Vec<EmitterError>,
    /// 로그를 모두 소진했으면 `true`
    pub completed: bool,
}

/// [`ReplayLog`]를 엔드포인트 하나에 재생합니다.
pub struct Replayer<E> {
    endpoint: E,
    log: ReplayLog,
}

impl<E: DataEndpoint> Replayer<E> {
    pub fn new(endpoint: E, log: ReplayLog) -> Self {
        Self { endpoint, log }
    }

    /// `raw`를 파싱해 replayer를 만듭니다.
    pub fn from_raw(endpoint: E, raw: &str) -> Result<Self, EmitterError> {
        Ok(Self::new(endpoint, ReplayLog::parse(raw)?))
    }

    /// 로그가 소진되거나 `cancel`이 발동할 때까지 재생합니다.
    pub async fn run(mut self, cancel: CancellationToken) -> ReplayReport {
        let mut report = ReplayReport::default();
        info!(
            offsets = self.log.len(),
            operations = self.log.operation_count(),
            "replay started"
        );

        let mut clock = interval(Duration::from_secs(1));
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut elapsed: u64 = 0;

        while !self.log.is_empty() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    warn!(remaining = self.log.operation_count(), "replay cancelled");
                    return report;
                }
                _ = clock.tick() => {
                    for operation in self.log.pop_at(elapsed) {
                        report.executed += 1;
                        if let Err(e) = execute(&self.endpoint, &operation).await {
                            debug!(offset = elapsed, error = %e, "replayed operation failed");
                            report.errors.push(e);
                        }
                    }
                    elapsed += 1;
                }
            }
        }

        report.completed = true;
        info!(
            executed = report.executed,
            errors = report.errors.len(),
            "replay completed"
        );
        report
    }
}
