//! `golden replay` command handler

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use golden_core::scenario::DeploymentCredentials;
use golden_workload::{
    DataEndpoint, EndpointConnector, EsDataEndpoint, EsEndpointConnector, ReplayLog, Replayer,
};

use crate::cli::ReplayArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `replay` command.
///
/// Ctrl-C cancels the replay; operations already sent are reported.
pub async fn execute(args: ReplayArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let raw = tokio::fs::read_to_string(&args.log).await?;
    let endpoint = connect(&args)?;
    info!(
        log = %args.log.display(),
        endpoint = endpoint.base_url(),
        "replaying workload log"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let summary = replay(endpoint, &raw, cancel).await;
    signal_task.abort();

    let summary = summary?;
    writer.render(&summary)?;
    summary.check()
}

/// Resolves `--url` or `--cloud-id` into a data endpoint.
pub fn connect(args: &ReplayArgs) -> Result<EsDataEndpoint, CliError> {
    let credentials = DeploymentCredentials {
        cloud_id: args.cloud_id.clone().unwrap_or_default(),
        endpoint: args.url.clone().unwrap_or_default(),
        username: args.username.clone(),
        password: args.password.clone(),
    };
    let connector = EsEndpointConnector::with_timeout(Duration::from_secs(args.timeout_secs));
    Ok(connector.connect(&credentials)?)
}

/// Replays `raw` against `endpoint` until drained or cancelled.
pub async fn replay<E: DataEndpoint>(
    endpoint: E,
    raw: &str,
    cancel: CancellationToken,
) -> Result<ReplaySummary, CliError> {
    let log = ReplayLog::parse(raw)?;
    let operations = log.operation_count();
    let report = Replayer::new(endpoint, log).run(cancel).await;

    Ok(ReplaySummary {
        operations,
        executed: report.executed,
        failed: report.errors.len(),
        errors: report.errors.iter().map(ToString::to_string).collect(),
        completed: report.completed,
    })
}

/// Outcome of one replay.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    /// Operations in the log.
    pub operations: usize,
    pub executed: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub completed: bool,
}

impl ReplaySummary {
    /// Fails when the replay was cancelled or any operation failed.
    pub fn check(&self) -> Result<(), CliError> {
        if !self.completed {
            return Err(CliError::Command(format!(
                "replay cancelled after {} of {} operations",
                self.executed, self.operations
            )));
        }
        if self.failed > 0 {
            return Err(CliError::Command(format!(
                "{} of {} operations failed",
                self.failed, self.operations
            )));
        }
        Ok(())
    }
}

impl Render for ReplaySummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let state = if self.completed { "completed" } else { "cancelled" };
        writeln!(
            w,
            "Replay {}: {}/{} operations executed, {} failed",
            state, self.executed, self.operations, self.failed
        )?;
        for error in &self.errors {
            writeln!(w, "  - {}", error)?;
        }
        Ok(())
    }
}
