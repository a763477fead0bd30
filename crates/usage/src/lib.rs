//! 골든 배포 검증기의 사용량 텔레메트리 클라이언트
//!
//! - [`UsageClient`]: validator가 사용하는 집계 조회 추상화
//! - [`EsUsageClient`]: `[usage]` 설정 기반 Elasticsearch 구현

pub mod client;
pub mod elasticsearch;
pub mod error;

pub use client::{UsageClient, UsageQuery};
pub use elasticsearch::EsUsageClient;
pub use error::UsageError;
