//! 배포 프로비저너 트레이트
//!
//! 시나리오 ID에서 결정적으로 유도된 배포 이름(`golden-{id}`)을 키로
//! 배포를 생성/조회/삭제합니다. 같은 이름으로 두 번 호출해도
//! 배포는 하나만 존재해야 합니다.

use std::future::Future;

use golden_core::scenario::{DeploymentCredentials, DeploymentTemplate};

use crate::error::ProvisionError;

/// 프로비저닝된 배포
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProvisionedDeployment {
    /// 배포 ID
    pub deployment_id: String,
    /// 배포에 속한 클러스터 리소스 ID 목록
    pub cluster_ids: Vec<String>,
    /// 데이터 엔드포인트 접속 정보
    pub credentials: DeploymentCredentials,
}

/// 배포 프로비저닝 추상화
///
/// 테스트에서는 호출 횟수를 세는 mock 구현으로 교체합니다.
pub trait DeploymentProvisioner: Send + Sync + 'static {
    /// 이름에 해당하는 배포가 없으면 템플릿으로 생성하고, 있으면 그대로 반환합니다.
    fn ensure_deployment(
        &self,
        name: &str,
        template: &DeploymentTemplate,
    ) -> impl Future<Output = Result<ProvisionedDeployment, ProvisionError>> + Send;

    /// 이름에 해당하는 배포의 클러스터 ID 목록 (없으면 `None`)
    fn check_exists(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Vec<String>>, ProvisionError>> + Send;

    /// 배포를 종료합니다.
    fn delete(&self, deployment_id: &str) -> impl Future<Output = Result<(), ProvisionError>> + Send;
}
