//! `golden scenario` command handler
//!
//! Reads and writes through the state store selected by `[state] backend`.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use golden_core::config::GoldenConfig;
use golden_core::scenario::{Scenario, WorkloadSpec};
use golden_core::validation::{UsageMetric, ValidationResult};
use golden_state::{ConfiguredStore, StateStore};

use crate::cli::{ScenarioAction, ScenarioArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `scenario` command.
pub async fn execute(
    args: ScenarioArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = GoldenConfig::load(config_path).await?;
    let store = ConfiguredStore::open(&config).await?;
    if store.backend_name() == "memory" {
        warn!("state backend is 'memory': nothing outlives this command");
    }

    match args.action {
        ScenarioAction::Create { file } => {
            let raw = tokio::fs::read_to_string(&file).await?;
            let scenario = create(&store, &raw).await?;
            writer.render(&ScenarioCreated {
                id: scenario.id.clone(),
                deployment_name: scenario.deployment_name(),
            })
        }
        ScenarioAction::List => writer.render(&list(&store).await?),
        ScenarioAction::Show { id } => writer.render(&show(&store, &id).await?),
    }
}

/// Parses and validates a scenario definition, assigns an ID and persists it.
///
/// A definition that already carries an ID is rejected.
pub async fn create<S: StateStore>(store: &S, raw: &str) -> Result<Scenario, CliError> {
    let mut scenario = Scenario::from_json(raw)?;
    scenario.generate_id()?;
    scenario.validate()?;
    store.save_scenario(&scenario).await?;
    info!(scenario_id = %scenario.id, "scenario created");
    Ok(scenario)
}

pub async fn list<S: StateStore>(store: &S) -> Result<ScenarioList, CliError> {
    let scenarios = store.list_scenarios().await?;
    Ok(ScenarioList {
        scenarios: scenarios.iter().map(ScenarioRow::from).collect(),
    })
}

pub async fn show<S: StateStore>(store: &S, id: &str) -> Result<ScenarioDetail, CliError> {
    let scenario = store.get_scenario(id).await?;
    Ok(ScenarioDetail::from(scenario))
}

/// Lifecycle stage derived from the persisted timestamps.
fn status(scenario: &Scenario) -> &'static str {
    if scenario.stopped_on.is_some() {
        "stopped"
    } else if scenario.is_active() {
        "active"
    } else if scenario.is_bound() {
        "bound"
    } else {
        "created"
    }
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_owned())
}

#[derive(Debug, Serialize)]
pub struct ScenarioCreated {
    pub id: String,
    pub deployment_name: String,
}

impl Render for ScenarioCreated {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Created scenario {}", self.id)?;
        writeln!(w, "Deployment name: {}", self.deployment_name)
    }
}

#[derive(Debug, Serialize)]
pub struct ScenarioRow {
    pub id: String,
    pub template: String,
    pub status: &'static str,
    pub started_on: Option<DateTime<Utc>>,
    pub stopped_on: Option<DateTime<Utc>>,
    pub validations: usize,
    /// Outcome of the most recent validation, if any.
    pub last_valid: Option<bool>,
}

impl From<&Scenario> for ScenarioRow {
    fn from(scenario: &Scenario) -> Self {
        Self {
            id: scenario.id.clone(),
            template: scenario.deployment_template.id.clone(),
            status: status(scenario),
            started_on: scenario.started_on,
            stopped_on: scenario.stopped_on,
            validations: scenario.validation_results.len(),
            last_valid: scenario.validation_results.last().map(ValidationResult::all_valid),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScenarioList {
    pub scenarios: Vec<ScenarioRow>,
}

impl Render for ScenarioList {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.scenarios.is_empty() {
            return writeln!(w, "No scenarios.");
        }
        writeln!(
            w,
            "{:<36} {:<24} {:<8} {:<19} {:>5} {:<5}",
            "ID", "Template", "Status", "Started", "Runs", "Last"
        )?;
        writeln!(w, "{}", "-".repeat(102))?;
        for row in &self.scenarios {
            let last = match row.last_valid {
                Some(true) => "ok",
                Some(false) => "FAIL",
                None => "-",
            };
            writeln!(
                w,
                "{:<36} {:<24} {:<8} {:<19} {:>5} {:<5}",
                row.id,
                row.template,
                row.status,
                format_time(row.started_on),
                row.validations,
                last
            )?;
        }
        Ok(())
    }
}

/// Scenario view without deployment credentials.
#[derive(Debug, Serialize)]
pub struct ScenarioDetail {
    pub id: String,
    pub template: String,
    pub deployment_name: String,
    pub status: &'static str,
    pub cluster_ids: Vec<String>,
    pub started_on: Option<DateTime<Utc>>,
    pub stopped_on: Option<DateTime<Utc>>,
    pub workload: WorkloadSpec,
    pub frequency_seconds: u64,
    pub window: String,
    pub validation_results: Vec<ValidationResult>,
}

impl From<Scenario> for ScenarioDetail {
    fn from(scenario: Scenario) -> Self {
        let window = scenario.validations.window();
        Self {
            template: scenario.deployment_template.id.clone(),
            deployment_name: scenario.deployment_name(),
            status: status(&scenario),
            started_on: scenario.started_on,
            stopped_on: scenario.stopped_on,
            frequency_seconds: scenario.validations.frequency_seconds,
            window: format!("{} .. {}", window.start, window.end),
            workload: scenario.workload,
            cluster_ids: scenario.cluster_ids,
            validation_results: scenario.validation_results,
            id: scenario.id,
        }
    }
}

impl Render for ScenarioDetail {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Scenario:    {}", self.id)?;
        writeln!(w, "Template:    {}", self.template)?;
        writeln!(w, "Deployment:  {}", self.deployment_name)?;
        writeln!(w, "Status:      {}", self.status)?;
        if !self.cluster_ids.is_empty() {
            writeln!(w, "Clusters:    {}", self.cluster_ids.join(", "))?;
        }
        writeln!(w, "Started:     {}", format_time(self.started_on))?;
        writeln!(w, "Stopped:     {}", format_time(self.stopped_on))?;
        writeln!(
            w,
            "Workload:    every {}-{}s, up to {} requests, index:search {}:1, offset {}s",
            self.workload.min_interval_seconds,
            self.workload.max_interval_seconds,
            self.workload.max_requests_per_tick,
            self.workload.index_to_search_ratio,
            self.workload.start_offset_seconds
        )?;
        writeln!(
            w,
            "Validation:  every {}s over {}",
            self.frequency_seconds, self.window
        )?;

        if self.validation_results.is_empty() {
            return writeln!(w, "\nNo validation results yet.");
        }
        for result in &self.validation_results {
            writeln!(
                w,
                "\n{} {}",
                result.validated_on.format("%Y-%m-%d %H:%M:%S"),
                if result.all_valid() { "valid" } else { "INVALID" }
            )?;
            for metric in UsageMetric::ALL {
                let entry = result.get(metric);
                match &entry.error {
                    Some(error) => writeln!(w, "  {:<30} error: {}", metric.as_str(), error)?,
                    None => writeln!(
                        w,
                        "  {:<30} {:>14.4} expected {} {}",
                        metric.as_str(),
                        entry.actual,
                        entry.expected,
                        if entry.is_valid { "ok" } else { "out of range" }
                    )?,
                }
            }
        }
        Ok(())
    }
}
