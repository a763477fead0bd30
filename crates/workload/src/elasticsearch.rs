//! Elasticsearch 데이터 엔드포인트
//!
//! 배포는 명시적 엔드포인트 URL 또는 Elastic Cloud ID
//! (`name:base64("host$es_uuid$kibana_uuid")`)로 지정하며, Cloud ID는
//! `https://{es_uuid}.{host}`로 해석됩니다.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use golden_core::error::describe_es_error;
use golden_core::scenario::DeploymentCredentials;
use serde_json::Value;
use tracing::trace;

use crate::endpoint::{DataEndpoint, EndpointConnector};
use crate::error::EmitterError;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Elasticsearch REST API 기반 데이터 엔드포인트
#[derive(Debug, Clone)]
pub struct EsDataEndpoint {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl EsDataEndpoint {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EmitterError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmitterError::Connect(e.to_string()))?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            username: username.into(),
            password: password.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        op: &str,
        target: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(), EmitterError> {
        let request = if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(&self.password))
        };

        let failed = |reason: String| EmitterError::Operation {
            op: op.to_owned(),
            target: target.to_owned(),
            reason,
        };

        let response = request.send().await.map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(describe_es_error(status.as_u16(), &body)));
        }
        trace!(op, target, status = status.as_u16(), "request completed");
        Ok(())
    }
}

impl DataEndpoint for EsDataEndpoint {
    async fn search(&self, target: &str, body: Option<&Value>) -> Result<(), EmitterError> {
        let url = format!("{}/{}/_search", self.base_url, target);
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send("search", target, request).await
    }

    async fn index(&self, target: &str, body: &Value) -> Result<(), EmitterError> {
        let url = format!("{}/{}/_doc", self.base_url, target);
        self.send("index", target, self.http.post(url).json(body)).await
    }
}

/// 바인딩된 자격 증명으로 HTTPS를 통해 배포에 연결합니다.
#[derive(Debug, Clone)]
pub struct EsEndpointConnector {
    timeout: Duration,
}

impl Default for EsEndpointConnector {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl EsEndpointConnector {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl EndpointConnector for EsEndpointConnector {
    type Endpoint = EsDataEndpoint;

    fn connect(&self, credentials: &DeploymentCredentials) -> Result<EsDataEndpoint, EmitterError> {
        let base_url = if !credentials.endpoint.is_empty() {
            credentials.endpoint.clone()
        } else if !credentials.cloud_id.is_empty() {
            endpoint_from_cloud_id(&credentials.cloud_id)?
        } else {
            return Err(EmitterError::Connect(
                "deployment credentials carry neither endpoint nor cloud_id".to_owned(),
            ));
        };
        EsDataEndpoint::new(
            base_url,
            credentials.username.clone(),
            credentials.password.clone(),
            self.timeout,
        )
    }
}

/// Elastic Cloud ID를 Elasticsearch HTTPS 엔드포인트로 해석합니다.
pub fn endpoint_from_cloud_id(cloud_id: &str) -> Result<String, EmitterError> {
    let invalid = |reason: &str| EmitterError::Connect(format!("invalid cloud_id: {reason}"));

    let (_, encoded) = cloud_id
        .split_once(':')
        .ok_or_else(|| invalid("missing ':' separator"))?;
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|e| invalid(&e.to_string()))?;
    let decoded = String::from_utf8(decoded).map_err(|e| invalid(&e.to_string()))?;

    let mut parts = decoded.split('$');
    let host = parts.next().filter(|h| !h.is_empty());
    let es_uuid = parts.next().filter(|u| !u.is_empty());
    match (host, es_uuid) {
        (Some(host), Some(es_uuid)) => {
            let host = host.trim_end_matches('/');
            let host = host.strip_suffix(":443").unwrap_or(host);
            Ok(format!("https://{es_uuid}.{host}"))
        }
        _ => Err(invalid("expected host$es_uuid$kibana_uuid")),
    }
}
