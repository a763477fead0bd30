//! 골든 배포용 합성 워크로드
//!
//! - [`operation`]: 요청 종류, 무작위 index/search 혼합, 문서
//! - [`generator`]: 오프라인 로그 생성 (JSON lines)
//! - [`replayer`]: 생성된 로그를 1초 클록으로 재생
//! - [`endpoint`]: [`DataEndpoint`] / [`EndpointConnector`] trait
//! - [`elasticsearch`]: 엔드포인트 trait의 REST 구현

pub mod elasticsearch;
pub mod endpoint;
pub mod error;
pub mod generator;
pub mod operation;
pub mod replayer;

pub use elasticsearch::{EsDataEndpoint, EsEndpointConnector};
pub use endpoint::{DataEndpoint, EndpointConnector, execute};
pub use error::EmitterError;
pub use generator::{Generator, GeneratorConfig, LogRecord};
pub use operation::{OpKind, OpMix, Operation, OperationFactory, random_document};
pub use replayer::{ReplayLog, ReplayReport, Replayer};
