//! 스크립트된 HTTP 응답기를 상대로 한 EsStateStore 테스트

use golden_core::config::{ClusterConfig, StateConfig};
use golden_core::scenario::Scenario;
use golden_state::{EsStateStore, StateError, StateStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const SCENARIO_SOURCE: &str = r#"{
    "id": "s-1",
    "deployment_template": {"id": "aws-io-optimized", "vars": {}},
    "validations": {
        "frequency_seconds": 3600,
        "start_timestamp": "now-1d/d",
        "end_timestamp": "now/d",
        "expectations": {
            "instance_capacity_gb_hours": {"min": 0, "max": 100},
            "data_out_gb": {"min": 0, "max": 1},
            "data_internode_gb": {"min": 0, "max": 1},
            "snapshot_storage_size_gb": {"min": 0, "max": 5},
            "snapshot_api_requests_count": {"min": 0, "max": 1000}
        }
    },
    "cluster_ids": ["es-1"],
    "started_on": "2026-01-01T00:00:00Z"
}"#;

const RESULT_SOURCE: &str = r#"{
    "scenario_id": "s-1",
    "validated_on": "2026-01-01T01:00:00Z",
    "instance_capacity_gb_hours": {"is_valid": true, "actual": 3.0, "expected": {"min": 0, "max": 100}},
    "data_out_gb": {"is_valid": false, "actual": 0.0, "expected": {"min": 0, "max": 0}, "error": "[500] boom"},
    "data_internode_gb": {"is_valid": true, "actual": 0.1, "expected": {"min": 0, "max": 1}},
    "snapshot_storage_size_gb": {"is_valid": true, "actual": 1.0, "expected": {"min": 0, "max": 5}},
    "snapshot_api_requests_count": {"is_valid": true, "actual": 12.0, "expected": {"min": 0, "max": 1000}}
}"#;

/// Answers each connection with the next scripted response, returning all raw requests.
async fn serve(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            requests.push(String::from_utf8_lossy(&buf).into_owned());
        }
        requests
    });
    (format!("http://{addr}"), handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|l| {
            l.to_ascii_lowercase()
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}

fn store(url: String) -> EsStateStore {
    let cluster = ClusterConfig {
        url,
        username: String::new(),
        password: String::new(),
        request_timeout_secs: 5,
    };
    EsStateStore::connect(&cluster, &StateConfig::default()).unwrap()
}

fn hits(sources: &[&str]) -> String {
    let hits: Vec<String> = sources
        .iter()
        .map(|s| format!(r#"{{"_index":"x","_id":"1","_source":{s}}}"#))
        .collect();
    format!(r#"{{"hits":{{"hits":[{}]}}}}"#, hits.join(","))
}

#[tokio::test]
async fn save_scenario_strips_results() {
    let (url, server) = serve(vec![("201 Created", r#"{"result":"created"}"#.to_owned())]).await;
    let mut scenario = Scenario::from_json(SCENARIO_SOURCE).unwrap();
    scenario.append_result(serde_json::from_str(RESULT_SOURCE).unwrap());

    store(url).save_scenario(&scenario).await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("PUT /golden-scenarios/_doc/s-1?refresh=wait_for "));
    assert!(requests[0].contains(r#""validation_results":[]"#));
}

#[tokio::test]
async fn get_scenario_attaches_results() {
    let found = format!(r#"{{"_index":"golden-scenarios","_id":"s-1","found":true,"_source":{SCENARIO_SOURCE}}}"#);
    let (url, server) = serve(vec![
        ("200 OK", found),
        ("200 OK", hits(&[RESULT_SOURCE])),
    ])
    .await;

    let scenario = store(url).get_scenario("s-1").await.unwrap();
    assert_eq!(scenario.id, "s-1");
    assert_eq!(scenario.validation_results.len(), 1);
    assert_eq!(
        scenario.validation_results[0].data_out_gb.error.as_deref(),
        Some("[500] boom")
    );

    let requests = server.await.unwrap();
    assert!(requests[1].starts_with("POST /golden-validation-results/_search "));
    assert!(requests[1].contains(r#""scenario_id":"s-1""#));
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let (url, _server) = serve(vec![(
        "404 Not Found",
        r#"{"_index":"golden-scenarios","_id":"s-9","found":false}"#.to_owned(),
    )])
    .await;
    assert!(matches!(
        store(url).get_scenario("s-9").await,
        Err(StateError::NotFound(_))
    ));
}

#[tokio::test]
async fn missing_index_lists_as_empty() {
    let (url, _server) = serve(vec![(
        "404 Not Found",
        r#"{"error":{"type":"index_not_found_exception","reason":"no such index [golden-scenarios]"},"status":404}"#.to_owned(),
    )])
    .await;
    assert!(store(url).list_scenarios().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_errors_are_described() {
    let (url, _server) = serve(vec![(
        "500 Internal Server Error",
        r#"{"error":{"type":"search_phase_execution_exception","reason":"all shards failed"},"status":500}"#.to_owned(),
    )])
    .await;
    match store(url).list_validation_results_for_scenario("s-1").await {
        Err(StateError::Query(msg)) => {
            assert_eq!(msg, "[500] search_phase_execution_exception: all shards failed");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn initialize_tolerates_existing_indices() {
    let exists = r#"{"error":{"type":"resource_already_exists_exception","reason":"index exists"},"status":400}"#;
    let (url, server) = serve(vec![
        ("400 Bad Request", exists.to_owned()),
        ("200 OK", r#"{"acknowledged":true}"#.to_owned()),
    ])
    .await;
    store(url).initialize().await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("PUT /golden-scenarios "));
    assert!(requests[1].starts_with("PUT /golden-validation-results "));
    assert!(requests[1].contains(r#""scenario_id":{"type":"keyword"}"#));
}
