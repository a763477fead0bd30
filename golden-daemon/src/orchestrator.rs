//! Daemon assembly and lifecycle.
//!
//! The [`Orchestrator`] builds the shared collaborators from `golden.toml`,
//! hands them to a [`ScenarioRunner`] and drives the process lifecycle:
//!
//! 1. write the PID file
//! 2. resume scenarios that were running before the last shutdown
//! 3. wait for SIGTERM / SIGINT
//! 4. cancel every scenario and wait for its loops (`runner.shutdown_timeout_secs`)
//! 5. remove the PID file

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use golden_core::config::GoldenConfig;
use golden_deployment::EcProvisioner;
use golden_runner::{ResumeReport, ScenarioRunner};
use golden_state::ConfiguredStore;
use golden_usage::EsUsageClient;
use golden_workload::{EsEndpointConnector, OperationFactory};

use crate::metrics_server;
use crate::pid_file::{remove_pid_file, write_pid_file};

/// Runner wired to the production adapters.
pub type DaemonRunner =
    ScenarioRunner<EsUsageClient, ConfiguredStore, EcProvisioner, EsEndpointConnector>;

pub struct Orchestrator {
    config: GoldenConfig,
    runner: Arc<DaemonRunner>,
    start_time: Instant,
}

impl Orchestrator {
    /// Load `golden.toml` (with environment overrides) and build the orchestrator.
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = GoldenConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config).await
    }

    /// Build from an already-loaded configuration.
    ///
    /// Opens the state store (creating Elasticsearch indices when that backend
    /// is selected). No scenario is started here.
    pub async fn build_from_config(config: GoldenConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let usage = EsUsageClient::connect(&config.usage_cluster, config.usage.clone())
            .map_err(|e| anyhow::anyhow!("failed to build usage client: {}", e))?;
        let store = ConfiguredStore::open(&config)
            .await
            .map_err(|e| anyhow::anyhow!("failed to open state store: {}", e))?;
        let provisioner = EcProvisioner::connect(&config.api)
            .map_err(|e| anyhow::anyhow!("failed to build deployment provisioner: {}", e))?;

        tracing::info!(
            state_backend = store.backend_name(),
            usage_cluster = %config.usage_cluster.url,
            api = %config.api.url,
            "collaborators initialized"
        );

        let runner = ScenarioRunner::new(
            Arc::new(usage),
            Arc::new(store),
            Arc::new(provisioner),
            EsEndpointConnector::default(),
        )
        .with_operation_factory(OperationFactory::from_config(&config.workload));

        if config.metrics.enabled {
            record_build_info();
        }

        Ok(Self {
            config,
            runner: Arc::new(runner),
            start_time: Instant::now(),
        })
    }

    /// Resume scenarios, then block until a shutdown signal and drain.
    pub async fn run(&mut self) -> Result<()> {
        let pid_path = (!self.config.general.pid_file.is_empty())
            .then(|| Path::new(&self.config.general.pid_file).to_path_buf());
        if let Some(path) = &pid_path {
            write_pid_file(path)?;
        }

        self.resume().await;

        let outcome = match wait_for_shutdown_signal().await {
            Ok(signal) => {
                tracing::info!(signal, "shutdown signal received");
                self.shutdown().await
            }
            Err(e) => {
                let _ = self.shutdown().await;
                Err(e)
            }
        };

        if let Some(path) = &pid_path {
            remove_pid_file(path);
        }
        outcome
    }

    /// Starts persisted scenarios that were running when the daemon last stopped.
    ///
    /// Never fails: an unreadable store or individual start failures are logged
    /// and the daemon keeps running with whatever did start.
    pub async fn resume(&self) -> ResumeReport {
        if !self.config.runner.resume_on_start {
            tracing::info!("scenario resume disabled");
            return ResumeReport::default();
        }
        match self.runner.resume_active().await {
            Ok(report) => {
                for (scenario_id, e) in &report.failed {
                    tracing::warn!(scenario_id = %scenario_id, error = %e, "scenario not resumed");
                }
                report
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to list scenarios for resume");
                ResumeReport::default()
            }
        }
    }

    /// Cancels every scenario and waits up to `runner.shutdown_timeout_secs`.
    pub async fn shutdown(&self) -> Result<()> {
        let timeout = self.config.runner.shutdown_timeout();
        tracing::info!(
            running = self.runner.running_ids().await.len(),
            timeout_secs = timeout.as_secs(),
            "stopping all scenarios"
        );
        self.runner
            .stop_all_and_wait(timeout)
            .await
            .map_err(|e| anyhow::anyhow!("shutdown incomplete: {}", e))
    }

    pub fn runner(&self) -> &Arc<DaemonRunner> {
        &self.runner
    }

    pub fn config(&self) -> &GoldenConfig {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Wait for SIGTERM or SIGINT and return the signal name.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

fn record_build_info() {
    use golden_core::metrics as m;

    metrics::gauge!(m::DAEMON_BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "build info recorded");
}
