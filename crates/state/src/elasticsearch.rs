//! Elasticsearch 기반 상태 저장소
//!
//! - 시나리오: `state.scenarios_index`에 시나리오당 문서 하나, `_id` = 시나리오 ID
//! - 검증 결과: `state.validation_results_index`에 실행당 문서 하나,
//!   `scenario_id`로 조회하고 `validated_on` 순으로 정렬
//!
//! 인덱스가 없으면 빈 결과로 읽습니다. 쓰기는 `refresh=wait_for`를 사용하므로
//! 쓰기 직후 읽기에서 바로 보입니다.

use golden_core::config::{ClusterConfig, StateConfig};
use golden_core::error::describe_es_error;
use golden_core::scenario::Scenario;
use golden_core::validation::ValidationResult;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::StateError;
use crate::store::{StateStore, ensure_scenario_id, sort_results, without_results};

/// 검색 1회가 반환하는 문서 수 상한
const MAX_SEARCH_SIZE: usize = 10_000;

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    hits: Hits<T>,
}

#[derive(Debug, Deserialize)]
struct Hits<T> {
    hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
struct Hit<T> {
    #[serde(rename = "_source")]
    source: T,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Scenario>,
}

#[derive(Debug, Clone)]
pub struct EsStateStore {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    scenarios_index: String,
    results_index: String,
}

impl EsStateStore {
    /// 주어진 클러스터용 저장소를 생성합니다. 처음 사용할 때까지 요청을 보내지 않습니다.
    pub fn connect(cluster: &ClusterConfig, state: &StateConfig) -> Result<Self, StateError> {
        let http = reqwest::Client::builder()
            .timeout(cluster.request_timeout())
            .build()
            .map_err(|e| StateError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cluster.url.trim_end_matches('/').to_owned(),
            username: cluster.username.clone(),
            password: cluster.password.clone(),
            scenarios_index: state.scenarios_index.clone(),
            results_index: state.validation_results_index.clone(),
        })
    }

    /// 두 인덱스가 없으면 명시적 매핑으로 생성합니다.
    ///
    /// `scenario_id`는 정확 일치 조회를 위해 keyword여야 하며, 자유 형식 템플릿
    /// 변수는 매핑에서 제외합니다.
    pub async fn initialize(&self) -> Result<(), StateError> {
        let scenarios = json!({
            "mappings": { "properties": {
                "id": { "type": "keyword" },
                "cluster_ids": { "type": "keyword" },
                "started_on": { "type": "date" },
                "stopped_on": { "type": "date" },
                "deployment_template": { "type": "object", "enabled": false },
                "deployment_credentials": { "type": "object", "enabled": false },
            } }
        });
        let results = json!({
            "mappings": { "properties": {
                "scenario_id": { "type": "keyword" },
                "validated_on": { "type": "date" },
            } }
        });
        self.create_index(&self.scenarios_index, &scenarios).await?;
        self.create_index(&self.results_index, &results).await
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<(), StateError> {
        let response = self
            .authorized(self.http.put(self.url(index)).json(body))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            info!(index, "index created");
            return Ok(());
        }
        if status == StatusCode::BAD_REQUEST && text.contains("resource_already_exists_exception") {
            debug!(index, "index already exists");
            return Ok(());
        }
        Err(StateError::Query(describe_es_error(status.as_u16(), &text)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// 요청을 보내고 `(status, body)`를 반환합니다. 404 처리는 호출자에게 맡깁니다.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, String), StateError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(StateError::Query(describe_es_error(status.as_u16(), &text)));
        }
        Ok((status, text))
    }

    async fn write(&self, request: reqwest::RequestBuilder) -> Result<(), StateError> {
        let (status, text) = self.send(request).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(StateError::Query(describe_es_error(status.as_u16(), &text)));
        }
        Ok(())
    }

    async fn search<T: DeserializeOwned>(&self, index: &str, body: &Value) -> Result<Vec<T>, StateError> {
        let (status, text) = self
            .send(self.http.post(self.url(&format!("{index}/_search"))).json(body))
            .await?;
        if status == StatusCode::NOT_FOUND {
            debug!(index, "index missing, reading as empty");
            return Ok(Vec::new());
        }
        let parsed: SearchResponse<T> = serde_json::from_str(&text)?;
        Ok(parsed.hits.hits.into_iter().map(|h| h.source).collect())
    }

    async fn with_results(&self, mut scenario: Scenario) -> Result<Scenario, StateError> {
        scenario.validation_results = self.list_validation_results_for_scenario(&scenario.id).await?;
        Ok(scenario)
    }
}

impl StateStore for EsStateStore {
    async fn save_scenario(&self, scenario: &Scenario) -> Result<(), StateError> {
        ensure_scenario_id(scenario)?;
        let path = format!("{}/_doc/{}?refresh=wait_for", self.scenarios_index, scenario.id);
        self.write(self.http.put(self.url(&path)).json(&without_results(scenario)))
            .await?;
        debug!(scenario_id = %scenario.id, "scenario saved");
        Ok(())
    }

    async fn get_scenario(&self, id: &str) -> Result<Scenario, StateError> {
        let path = format!("{}/_doc/{}", self.scenarios_index, id);
        let (status, text) = self.send(self.http.get(self.url(&path))).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(StateError::NotFound(id.to_owned()));
        }
        let parsed: GetResponse = serde_json::from_str(&text)?;
        match parsed.source {
            Some(scenario) if parsed.found => self.with_results(scenario).await,
            _ => Err(StateError::NotFound(id.to_owned())),
        }
    }

    async fn list_scenarios(&self) -> Result<Vec<Scenario>, StateError> {
        let body = json!({ "size": MAX_SEARCH_SIZE, "query": { "match_all": {} } });
        let stored: Vec<Scenario> = self.search(&self.scenarios_index, &body).await?;
        let mut scenarios = Vec::with_capacity(stored.len());
        for scenario in stored {
            scenarios.push(self.with_results(scenario).await?);
        }
        scenarios.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(scenarios)
    }

    async fn save_validation_result(&self, result: &ValidationResult) -> Result<(), StateError> {
        if result.scenario_id.is_empty() {
            return Err(StateError::Invalid(
                "validation result has no scenario_id".to_owned(),
            ));
        }
        let path = format!("{}/_doc?refresh=wait_for", self.results_index);
        self.write(self.http.post(self.url(&path)).json(result)).await?;
        debug!(scenario_id = %result.scenario_id, "validation result saved");
        Ok(())
    }

    async fn list_validation_results_for_scenario(
        &self,
        scenario_id: &str,
    ) -> Result<Vec<ValidationResult>, StateError> {
        let body = json!({
            "size": MAX_SEARCH_SIZE,
            "query": { "term": { "scenario_id": scenario_id } },
            "sort": [{ "validated_on": { "order": "asc" } }],
        });
        let mut results: Vec<ValidationResult> = self.search(&self.results_index, &body).await?;
        sort_results(&mut results);
        Ok(results)
    }
}
