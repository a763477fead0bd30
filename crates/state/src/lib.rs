//! 골든 시나리오와 검증 결과의 영속화
//!
//! - [`StateStore`]: runner와 CLI가 사용하는 저장소 추상화
//! - [`EsStateStore`]: Elasticsearch 인덱스
//! - [`MemoryStateStore`]: 프로세스 내 맵
//! - [`ConfiguredStore`]: `[state] backend`가 선택한 둘 중 하나

pub mod backend;
pub mod elasticsearch;
pub mod error;
pub mod memory;
pub mod store;

pub use backend::ConfiguredStore;
pub use elasticsearch::EsStateStore;
pub use error::StateError;
pub use memory::MemoryStateStore;
pub use store::StateStore;
