//! Metrics recorder installation.

use golden_core::config::MetricsConfig;
use golden_daemon::metrics_server;
use serial_test::serial;

fn config(listen_addr: &str, port: u16, endpoint: &str) -> MetricsConfig {
    MetricsConfig {
        enabled: true,
        listen_addr: listen_addr.to_owned(),
        port,
        endpoint: endpoint.to_owned(),
    }
}

#[test]
#[serial]
fn test_install_metrics_recorder_rejects_unsupported_endpoint() {
    let result = metrics_server::install_metrics_recorder(&config("127.0.0.1", 19465, "/custom"));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_install_metrics_recorder_fails_with_invalid_address() {
    let result =
        metrics_server::install_metrics_recorder(&config("999.999.999.999", 19466, "/metrics"));
    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn test_install_metrics_recorder_once() {
    let first = metrics_server::install_metrics_recorder(&config("127.0.0.1", 19464, "/metrics"));
    assert!(first.is_ok(), "first install should succeed: {:?}", first.err());

    // a process has a single global recorder
    let second = metrics_server::install_metrics_recorder(&config("127.0.0.1", 19467, "/metrics"));
    assert!(second.is_err());
}
