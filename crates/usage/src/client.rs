//! 사용량 텔레메트리 추상화
//!
//! [`UsageClient`] trait은 텔레메트리 백엔드를 감춥니다. 테스트에서는 스크립트된
//! 클라이언트로 validator를 검증하고, 실제 코드는
//! [`EsUsageClient`](crate::EsUsageClient)를 사용합니다.
//!
//! ```text
//! ┌───────────┐   query(metric, ids, window)   ┌─────────────┐
//! │ Validator │ ─────────────────────────────▶ │ UsageClient │ (trait)
//! └───────────┘                                └─────────────┘
//!                                                │        │
//!                                                ▼        ▼
//!                                         EsUsageClient  mock
//! ```

use std::future::Future;

use golden_core::scenario::TimeWindow;
use golden_core::validation::UsageMetric;

use crate::error::UsageError;

/// 집계 사용량 조회 1회의 파라미터
#[derive(Debug, Clone, PartialEq)]
pub struct UsageQuery {
    /// 검증 대상 배포의 리소스 ID
    pub cluster_ids: Vec<String>,
    /// 반개구간 `[start, end)`
    pub window: TimeWindow,
}

impl UsageQuery {
    pub fn new(cluster_ids: Vec<String>, window: TimeWindow) -> Self {
        Self {
            cluster_ids,
            window,
        }
    }
}

/// 집계 사용량 조회 추상화 trait
///
/// 인스턴스 하나를 모든 검증 루프가 `Arc`로 공유하므로
/// 구현체는 동시 사용에 안전해야 합니다.
pub trait UsageClient: Send + Sync + 'static {
    /// 조회 대상 클러스터와 구간에 대한 `metric` 합계를 반환합니다.
    ///
    /// # Errors
    ///
    /// - `UsageError::Unmapped`: 이 메트릭의 소스가 설정되지 않음
    /// - `UsageError::Http` / `UsageError::Query`: 백엔드 호출 실패
    fn query(
        &self,
        metric: UsageMetric,
        query: &UsageQuery,
    ) -> impl Future<Output = Result<f64, UsageError>> + Send;
}
