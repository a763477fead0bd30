//! 데이터 엔드포인트 추상화
//!
//! [`DataEndpoint`]는 프로비저닝된 배포 하나에 search/index 요청을 보냅니다.
//! [`EndpointConnector`]는 시나리오에 바인딩된 자격 증명으로 엔드포인트를 만들며,
//! 실행 중인 시나리오마다 자체 클라이언트를 가집니다.

use std::future::Future;

use golden_core::scenario::DeploymentCredentials;
use serde_json::Value;

use crate::error::EmitterError;
use crate::operation::{OpKind, Operation};

/// 배포 데이터 엔드포인트 요청 추상화 trait
pub trait DataEndpoint: Send + Sync + 'static {
    /// `target`에 검색을 실행합니다. 쿼리 본문은 선택입니다.
    fn search(
        &self,
        target: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<(), EmitterError>> + Send;

    /// `target`에 문서 하나를 색인합니다.
    fn index(
        &self,
        target: &str,
        body: &Value,
    ) -> impl Future<Output = Result<(), EmitterError>> + Send;
}

/// 바인딩된 배포용 [`DataEndpoint`]를 생성합니다.
pub trait EndpointConnector: Send + Sync + 'static {
    type Endpoint: DataEndpoint;

    /// `credentials`가 가리키는 배포의 클라이언트를 생성합니다.
    ///
    /// # Errors
    ///
    /// 자격 증명이 도달 가능한 엔드포인트를 가리키지 않거나 클라이언트를
    /// 만들 수 없으면 `EmitterError::Connect`를 반환합니다.
    fn connect(&self, credentials: &DeploymentCredentials) -> Result<Self::Endpoint, EmitterError>;
}

/// `operation`을 해당 엔드포인트 호출로 보냅니다.
pub async fn execute<E: DataEndpoint>(endpoint: &E, operation: &Operation) -> Result<(), EmitterError> {
    match operation.op {
        OpKind::Search => endpoint.search(&operation.target, operation.body.as_ref()).await,
        OpKind::Index => match &operation.body {
            Some(body) => endpoint.index(&operation.target, body).await,
            None => Err(EmitterError::Operation {
                op: OpKind::Index.to_string(),
                target: operation.target.clone(),
                reason: "index operation has no document body".to_owned(),
            }),
        },
    }
}
