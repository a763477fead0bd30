//! Elastic Cloud 배포 API 프로비저너
//!
//! | 동작 | 요청 |
//! |---|---|
//! | 목록 | `GET  /api/v1/deployments` |
//! | 생성 | `POST /api/v1/deployments` |
//! | 비밀번호 재설정 | `POST /api/v1/deployments/{id}/elasticsearch/{ref_id}/_reset-password` |
//! | 종료 | `POST /api/v1/deployments/{id}/_shutdown` |
//!
//! 모든 요청은 `Authorization: ApiKey {key}` 헤더를 사용합니다.

use std::time::Duration;

use golden_core::config::ApiConfig;
use golden_core::scenario::{DeploymentCredentials, DeploymentTemplate};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ProvisionError;
use crate::provisioner::{DeploymentProvisioner, ProvisionedDeployment};
use crate::template::TemplateStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const ES_RESOURCE_KIND: &str = "elasticsearch";
const DEFAULT_ES_USERNAME: &str = "elastic";

#[derive(Debug, Deserialize)]
struct DeploymentList {
    #[serde(default)]
    deployments: Vec<DeploymentSummary>,
}

/// 목록/생성 응답의 배포 요약
#[derive(Debug, Clone, Deserialize)]
struct DeploymentSummary {
    id: String,
    name: String,
    #[serde(default)]
    resources: Vec<ResourceSummary>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceSummary {
    id: String,
    kind: String,
    #[serde(default)]
    ref_id: String,
    #[serde(default)]
    cloud_id: Option<String>,
    /// 생성 응답에만 포함됨
    #[serde(default)]
    credentials: Option<ResourceCredentials>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceCredentials {
    #[serde(default)]
    username: Option<String>,
    password: String,
}

impl DeploymentSummary {
    fn cluster_ids(&self) -> Vec<String> {
        self.resources.iter().map(|r| r.id.clone()).collect()
    }

    fn elasticsearch(&self) -> Result<&ResourceSummary, ProvisionError> {
        self.resources
            .iter()
            .find(|r| r.kind == ES_RESOURCE_KIND)
            .ok_or_else(|| {
                ProvisionError::Decode(format!(
                    "deployment '{}' has no elasticsearch resource",
                    self.id
                ))
            })
    }
}

/// Elastic Cloud 프로비저너
#[derive(Debug, Clone)]
pub struct EcProvisioner {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    templates: TemplateStore,
}

impl EcProvisioner {
    /// API 설정으로 프로비저너를 생성합니다.
    ///
    /// # Errors
    ///
    /// API 키가 비어 있거나 HTTP 클라이언트 생성에 실패하면 `ProvisionError::Config`
    pub fn connect(config: &ApiConfig) -> Result<Self, ProvisionError> {
        if config.key.is_empty() {
            return Err(ProvisionError::Config("api.key is empty".to_owned()));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProvisionError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.key.clone(),
            templates: TemplateStore::new(&config.templates_dir),
        })
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/deployments{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProvisionError> {
        let response = request
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ProvisionError::Api(describe_api_error(status.as_u16(), &text)));
        }
        serde_json::from_str(&text).map_err(|e| ProvisionError::Decode(e.to_string()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<DeploymentSummary>, ProvisionError> {
        let list: DeploymentList = self.send(self.http.get(self.url(""))).await?;
        let mut matching = list.deployments.into_iter().filter(|d| d.name == name);
        let found = matching.next();
        if matching.next().is_some() {
            warn!(name, "multiple deployments share one name, using the first");
        }
        Ok(found)
    }

    async fn reset_password(
        &self,
        deployment_id: &str,
        ref_id: &str,
    ) -> Result<ResourceCredentials, ProvisionError> {
        let path = format!("/{deployment_id}/elasticsearch/{ref_id}/_reset-password");
        self.send(self.http.post(self.url(&path))).await
    }

    async fn create(
        &self,
        name: &str,
        template: &DeploymentTemplate,
    ) -> Result<DeploymentSummary, ProvisionError> {
        let mut request = self.templates.render(template).await?;
        if let Value::Object(body) = &mut request {
            body.insert("name".to_owned(), Value::String(name.to_owned()));
        }
        debug!(name, template_id = %template.id, "creating deployment");
        self.send(self.http.post(self.url("")).json(&request)).await
    }
}

fn credentials_for(
    es: &ResourceSummary,
    creds: &ResourceCredentials,
) -> DeploymentCredentials {
    DeploymentCredentials {
        cloud_id: es.cloud_id.clone().unwrap_or_default(),
        endpoint: String::new(),
        username: creds
            .username
            .clone()
            .unwrap_or_else(|| DEFAULT_ES_USERNAME.to_owned()),
        password: creds.password.clone(),
    }
}

impl DeploymentProvisioner for EcProvisioner {
    async fn ensure_deployment(
        &self,
        name: &str,
        template: &DeploymentTemplate,
    ) -> Result<ProvisionedDeployment, ProvisionError> {
        if let Some(existing) = self.find_by_name(name).await? {
            info!(name, deployment_id = %existing.id, "deployment already exists");
            let es = existing.elasticsearch()?;
            // 기존 배포의 비밀번호는 조회할 수 없으므로 재설정
            let creds = self.reset_password(&existing.id, &es.ref_id).await?;
            return Ok(ProvisionedDeployment {
                deployment_id: existing.id.clone(),
                cluster_ids: existing.cluster_ids(),
                credentials: credentials_for(es, &creds),
            });
        }

        let created = self.create(name, template).await?;
        let es = created.elasticsearch()?;
        let creds = es.credentials.as_ref().ok_or_else(|| {
            ProvisionError::Decode(format!(
                "create response for '{}' carries no elasticsearch credentials",
                created.id
            ))
        })?;
        info!(name, deployment_id = %created.id, "deployment created");
        Ok(ProvisionedDeployment {
            deployment_id: created.id.clone(),
            cluster_ids: created.cluster_ids(),
            credentials: credentials_for(es, creds),
        })
    }

    async fn check_exists(&self, name: &str) -> Result<Option<Vec<String>>, ProvisionError> {
        Ok(self
            .find_by_name(name)
            .await?
            .map(|d| d.cluster_ids()))
    }

    async fn delete(&self, deployment_id: &str) -> Result<(), ProvisionError> {
        let path = format!("/{deployment_id}/_shutdown");
        let _: Value = self.send(self.http.post(self.url(&path))).await?;
        info!(deployment_id, "deployment shut down");
        Ok(())
    }
}

/// Elastic Cloud 에러 응답을 `[status] code: message` 형태로 요약합니다.
///
/// `{"errors":[{"code","message"}]}` 형식이 아니면 본문을 그대로 사용합니다.
pub fn describe_api_error(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiErrors {
        errors: Vec<ApiErrorItem>,
    }
    #[derive(Deserialize)]
    struct ApiErrorItem {
        #[serde(default)]
        code: String,
        #[serde(default)]
        message: String,
    }

    match serde_json::from_str::<ApiErrors>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => {
            let joined: Vec<String> = parsed
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect();
            format!("[{status}] {}", joined.join("; "))
        }
        _ => format!("[{status}] {}", body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_uses_code_and_message() {
        let body = r#"{"errors":[{"code":"deployments.not_found","message":"No deployment"}]}"#;
        assert_eq!(
            describe_api_error(404, body),
            "[404] deployments.not_found: No deployment"
        );
    }

    #[test]
    fn api_error_falls_back_to_body() {
        assert_eq!(describe_api_error(502, " bad gateway \n"), "[502] bad gateway");
    }

    #[test]
    fn connect_requires_api_key() {
        let config = ApiConfig::default();
        assert!(matches!(
            EcProvisioner::connect(&config),
            Err(ProvisionError::Config(_))
        ));
    }

    #[test]
    fn summary_collects_all_resource_ids() {
        let summary: DeploymentSummary = serde_json::from_str(
            r#"{"id":"d1","name":"golden-x","resources":[
                {"id":"es1","kind":"elasticsearch","ref_id":"main-elasticsearch","cloud_id":"c"},
                {"id":"kb1","kind":"kibana","ref_id":"main-kibana"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(summary.cluster_ids(), vec!["es1", "kb1"]);
        assert_eq!(summary.elasticsearch().unwrap().ref_id, "main-elasticsearch");
    }

    #[test]
    fn summary_without_elasticsearch_is_decode_error() {
        let summary: DeploymentSummary =
            serde_json::from_str(r#"{"id":"d1","name":"n","resources":[]}"#).unwrap();
        assert!(matches!(
            summary.elasticsearch(),
            Err(ProvisionError::Decode(_))
        ));
    }
}
