//! `golden config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use golden_core::config::GoldenConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

const REDACTED: &str = "***REDACTED***";

const SECTIONS: [&str; 9] = [
    "general",
    "api",
    "usage_cluster",
    "state_cluster",
    "usage",
    "state",
    "workload",
    "runner",
    "metrics",
];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Loads the file with environment overrides and reports whether it is valid.
///
/// # Errors
///
/// `CliError::Config` when the file is missing, malformed or invalid.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validation_report(config_path).await;
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

pub async fn validation_report(config_path: &Path) -> ConfigValidationReport {
    let errors = match GoldenConfig::load(config_path).await {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };
    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    }
}

async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let mut config = GoldenConfig::load(config_path).await?;
    redact_secrets(&mut config);

    let report = ConfigReport {
        source: config_path.display().to_string(),
        config_toml: section_toml(&config, section.as_deref())?,
        section,
    };
    writer.render(&report)
}

/// Serializes the whole config, or one section of it, as TOML.
pub fn section_toml(config: &GoldenConfig, section: Option<&str>) -> Result<String, CliError> {
    let rendered = match section {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("api") => toml::to_string_pretty(&config.api),
        Some("usage_cluster") => toml::to_string_pretty(&config.usage_cluster),
        Some("state_cluster") => toml::to_string_pretty(&config.state_cluster),
        Some("usage") => toml::to_string_pretty(&config.usage),
        Some("state") => toml::to_string_pretty(&config.state),
        Some("workload") => toml::to_string_pretty(&config.workload),
        Some("runner") => toml::to_string_pretty(&config.runner),
        Some("metrics") => toml::to_string_pretty(&config.metrics),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected one of: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    };
    rendered.map_err(|e| CliError::Command(format!("failed to serialize config: {}", e)))
}

/// Replaces the API key and cluster passwords.
pub fn redact_secrets(config: &mut GoldenConfig) {
    for secret in [
        &mut config.api.key,
        &mut config.usage_cluster.password,
        &mut config.state_cluster.password,
    ] {
        if !secret.is_empty() {
            *secret = REDACTED.to_owned();
        }
    }
}

/// Result of `config validate`.
#[derive(Debug, Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.valid {
            writeln!(w, "Configuration OK: {}", self.source)
        } else {
            writeln!(w, "Configuration INVALID: {}", self.source)?;
            for error in &self.errors {
                writeln!(w, "  - {}", error)?;
            }
            Ok(())
        }
    }
}

/// Result of `config show`.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match &self.section {
            Some(section) => writeln!(w, "# {} [{}]", self.source, section)?,
            None => writeln!(w, "# {}", self.source)?,
        }
        write!(w, "{}", self.config_toml)
    }
}
