//! Golden 배포 프로비저닝
//!
//! - [`template`]: 배포 템플릿 로딩과 `{{vars.NAME}}` 치환
//! - [`provisioner`]: [`DeploymentProvisioner`] 트레이트
//! - [`elastic_cloud`]: Elastic Cloud 배포 API 구현

pub mod elastic_cloud;
pub mod error;
pub mod provisioner;
pub mod template;

pub use elastic_cloud::EcProvisioner;
pub use error::ProvisionError;
pub use provisioner::{DeploymentProvisioner, ProvisionedDeployment};
pub use template::{TemplateFile, TemplateStore, VarSpec};
