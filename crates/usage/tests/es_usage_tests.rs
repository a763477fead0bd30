//! 고정 HTTP 응답기를 상대로 한 EsUsageClient 테스트

use golden_core::config::{ClusterConfig, UsageConfig};
use golden_core::scenario::{TimeBound, TimeWindow};
use golden_core::validation::UsageMetric;
use golden_usage::{EsUsageClient, UsageClient, UsageError, UsageQuery};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves exactly one HTTP response and returns the raw request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
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
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    (format!("http://{addr}"), rx)
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|l| {
            let lower = l.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);
    buf.len() >= header_end + 4 + content_length
}

fn query() -> UsageQuery {
    UsageQuery::new(
        vec!["abc123".to_owned()],
        TimeWindow {
            start: TimeBound::Relative("now-1d".to_owned()),
            end: TimeBound::Relative("now".to_owned()),
        },
    )
}

fn client(url: String) -> EsUsageClient {
    let cluster = ClusterConfig {
        url,
        username: "elastic".to_owned(),
        password: "changeme".to_owned(),
        request_timeout_secs: 5,
    };
    EsUsageClient::connect(&cluster, UsageConfig::default()).unwrap()
}

#[tokio::test]
async fn data_out_sums_proxy_metering_index() {
    let (url, request) =
        serve_once("200 OK", r#"{"aggregations":{"total":{"value":1.25}}}"#).await;

    let value = client(url).query(UsageMetric::DataOutGb, &query()).await.unwrap();
    assert_eq!(value, 1.25);

    let raw = request.await.unwrap();
    assert!(raw.starts_with("POST /aggregations-proxy-metering-*/_search"));
    assert!(raw.to_ascii_lowercase().contains("authorization: basic"));
    assert!(raw.contains("cluster_id.keyword"));
    assert!(raw.contains("abc123"));
}

#[tokio::test]
async fn snapshot_api_requests_adds_usage_type_filter() {
    let (url, request) =
        serve_once("200 OK", r#"{"aggregations":{"total":{"value":7}}}"#).await;

    let value = client(url)
        .query(UsageMetric::SnapshotApiRequestsCount, &query())
        .await
        .unwrap();
    assert_eq!(value, 7.0);

    let raw = request.await.unwrap();
    assert!(raw.contains("storage_api"));
    assert!(raw.contains("ece.usage.count"));
}

#[tokio::test]
async fn error_status_is_reported_with_type_and_reason() {
    let (url, _request) = serve_once(
        "404 Not Found",
        r#"{"error":{"type":"index_not_found_exception","reason":"no such index"},"status":404}"#,
    )
    .await;

    let err = client(url)
        .query(UsageMetric::DataInterNodeGb, &query())
        .await
        .unwrap_err();
    match err {
        UsageError::Query(msg) => {
            assert_eq!(msg, "[404] index_not_found_exception: no such index");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
