//! Elasticsearch 기반 사용량 텔레메트리
//!
//! 추적 메트릭은 모두 인덱스 패턴 하나에 대한 `sum` 집계이며, 배포의 클러스터 ID와
//! 검증 구간으로 필터링합니다:
//!
//! ```json
//! {
//!   "size": 0,
//!   "query": { "bool": { "filter": [
//!     { "terms": { "<id_field>": ["<cluster id>", ...] } },
//!     { "range": { "<timestamp_field>": { "gte": "<start>", "lt": "<end>" } } },
//!     { "term":  { "<usage type field>": "<value>" } }
//!   ] } },
//!   "aggs": { "total": { "sum": { "field": "<value_field>" } } }
//! }
//! ```
//!
//! 마지막 `term` 필터는 usage type을 선언한 소스에만 붙습니다.
//! 메트릭별 인덱스와 필드는 `[usage]` 설정 섹션에서 가져오며,
//! 소스가 없는 메트릭은 [`UsageError::Unmapped`]로 실패합니다.

use golden_core::config::{ClusterConfig, UsageConfig, UsageSource};
use golden_core::error::describe_es_error;
use golden_core::validation::UsageMetric;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::client::{UsageClient, UsageQuery};
use crate::error::UsageError;

/// Elasticsearch 클러스터에서 합계 집계를 수행하는 사용량 클라이언트
#[derive(Debug, Clone)]
pub struct EsUsageClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    sources: UsageConfig,
}

impl EsUsageClient {
    /// 주어진 클러스터와 메트릭 매핑으로 클라이언트를 생성합니다.
    ///
    /// 첫 조회 전까지 요청을 보내지 않습니다.
    pub fn connect(cluster: &ClusterConfig, sources: UsageConfig) -> Result<Self, UsageError> {
        let http = reqwest::Client::builder()
            .timeout(cluster.request_timeout())
            .build()
            .map_err(|e| UsageError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: cluster.url.trim_end_matches('/').to_owned(),
            username: cluster.username.clone(),
            password: cluster.password.clone(),
            sources,
        })
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.base_url, index)
    }
}

impl UsageClient for EsUsageClient {
    async fn query(&self, metric: UsageMetric, query: &UsageQuery) -> Result<f64, UsageError> {
        let source = self
            .sources
            .source_for(metric)
            .ok_or_else(|| UsageError::Unmapped(metric.as_str().to_owned()))?;

        let body = build_sum_query(source, query);
        debug!(metric = %metric, index = %source.index, body = %body, "usage query");

        let mut request = self.http.post(self.search_url(&source.index)).json(&body);
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(UsageError::Query(describe_es_error(status.as_u16(), &text)));
        }

        debug!(metric = %metric, body = %text, "usage response");
        parse_sum_response(&text)
    }
}

/// `source.value_field`를 합산하는 `_search` 본문을 생성합니다.
pub fn build_sum_query(source: &UsageSource, query: &UsageQuery) -> Value {
    let mut filters = vec![
        json!({ "terms": { source.id_field.as_str(): query.cluster_ids } }),
        json!({
            "range": {
                source.timestamp_field.as_str(): {
                    "gte": query.window.start.as_query_value(),
                    "lt": query.window.end.as_query_value(),
                }
            }
        }),
    ];
    if let Some(usage_type) = &source.usage_type {
        filters.push(json!({ "term": { usage_type.field.as_str(): usage_type.value } }));
    }

    json!({
        "size": 0,
        "query": { "bool": { "filter": filters } },
        "aggs": { "total": { "sum": { "field": source.value_field } } },
    })
}

#[derive(Deserialize)]
struct SumResponse {
    aggregations: Aggregations,
}

#[derive(Deserialize)]
struct Aggregations {
    total: SumValue,
}

#[derive(Deserialize)]
struct SumValue {
    // 일치하는 문서가 없으면 `null`
    value: Option<f64>,
}

/// 검색 응답에서 `aggregations.total.value`를 추출합니다.
pub fn parse_sum_response(body: &str) -> Result<f64, UsageError> {
    let parsed: SumResponse =
        serde_json::from_str(body).map_err(|e| UsageError::Decode(e.to_string()))?;
    Ok(parsed.aggregations.total.value.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_core::config::UsageTypeFilter;
    use golden_core::scenario::{TimeBound, TimeWindow};

    fn query() -> UsageQuery {
        UsageQuery::new(
            vec!["c1".to_owned(), "c2".to_owned()],
            TimeWindow {
                start: TimeBound::Relative("now-1d/d".to_owned()),
                end: TimeBound::Relative("now/d".to_owned()),
            },
        )
    }

    fn source(usage_type: Option<UsageTypeFilter>) -> UsageSource {
        UsageSource {
            index: "usage-v*".to_owned(),
            id_field: "ece.source.cluster".to_owned(),
            value_field: "ece.usage.count".to_owned(),
            timestamp_field: "@timestamp".to_owned(),
            usage_type,
        }
    }

    #[test]
    fn sum_query_filters_by_ids_and_window() {
        let body = build_sum_query(&source(None), &query());
        assert_eq!(body["size"], 0);
        let filters = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0]["terms"]["ece.source.cluster"], json!(["c1", "c2"]));
        assert_eq!(filters[1]["range"]["@timestamp"]["gte"], "now-1d/d");
        assert_eq!(filters[1]["range"]["@timestamp"]["lt"], "now/d");
        assert_eq!(body["aggs"]["total"]["sum"]["field"], "ece.usage.count");
    }

    #[test]
    fn sum_query_appends_usage_type_term() {
        let body = build_sum_query(
            &source(Some(UsageTypeFilter {
                field: "ece.usage.type".to_owned(),
                value: "storage_api".to_owned(),
            })),
            &query(),
        );
        let filters = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[2]["term"]["ece.usage.type"], "storage_api");
    }

    #[test]
    fn parses_sum_value() {
        let body = r#"{"took":3,"hits":{"total":{"value":12}},"aggregations":{"total":{"value":42.5}}}"#;
        assert_eq!(parse_sum_response(body).unwrap(), 42.5);
    }

    #[test]
    fn null_sum_reads_as_zero() {
        let body = r#"{"aggregations":{"total":{"value":null}}}"#;
        assert_eq!(parse_sum_response(body).unwrap(), 0.0);
    }

    #[test]
    fn missing_aggregation_is_decode_error() {
        assert!(matches!(
            parse_sum_response(r#"{"hits":{}}"#),
            Err(UsageError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unmapped_metric_fails_without_request() {
        let cluster = ClusterConfig {
            // unroutable; an actual request would error differently
            url: "http://127.0.0.1:1".to_owned(),
            ..Default::default()
        };
        let client = EsUsageClient::connect(&cluster, UsageConfig::default()).unwrap();
        let err = client
            .query(UsageMetric::InstanceCapacityGbHours, &query())
            .await
            .unwrap_err();
        assert!(matches!(err, UsageError::Unmapped(ref m) if m == "instance_capacity_gb_hours"));
    }
}
