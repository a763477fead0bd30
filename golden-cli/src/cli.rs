//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no I/O happens here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Golden -- billing validation through golden deployments.
///
/// Use `golden <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "golden", version, about, long_about = None)]
pub struct Cli {
    /// Path to the golden.toml configuration file.
    #[arg(short, long, global = true, default_value = "golden.toml")]
    pub config: PathBuf,

    /// Log level for diagnostics on stderr (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Report format.
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a workload log (JSON lines).
    Generate(GenerateArgs),

    /// Replay a workload log against a deployment.
    Replay(ReplayArgs),

    /// Manage persisted scenarios.
    Scenario(ScenarioArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate ----

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Offset of the first record, in seconds.
    #[arg(long, default_value_t = 0)]
    pub start_offset: u64,

    /// Maximum number of records (0 = unbounded).
    #[arg(long, default_value_t = 1200)]
    pub max_count: u64,

    /// Stop before this offset in seconds (0 = unbounded).
    #[arg(long, default_value_t = 3500)]
    pub max_offset: u64,

    /// Minimum gap between records, in seconds.
    #[arg(long, default_value_t = 0)]
    pub min_interval: u64,

    /// Maximum gap between records, in seconds.
    #[arg(long, default_value_t = 3)]
    pub max_interval: u64,

    /// Index operations per search operation.
    #[arg(long, default_value_t = 4)]
    pub index_to_search_ratio: u32,

    /// Index pattern searched by `search` records.
    #[arg(long, default_value = "foo*")]
    pub search_target: String,

    /// Index written by `index` records.
    #[arg(long, default_value = "foo")]
    pub index_target: String,

    /// Seed for a reproducible log.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the log to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ---- replay ----

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Workload log produced by `golden generate`.
    #[arg(long)]
    pub log: PathBuf,

    /// Elasticsearch endpoint URL.
    #[arg(long, required_unless_present = "cloud_id", conflicts_with = "cloud_id")]
    pub url: Option<String>,

    /// Elastic Cloud ID of the target deployment.
    #[arg(long)]
    pub cloud_id: Option<String>,

    #[arg(long, default_value = "elastic")]
    pub username: String,

    #[arg(long, default_value = "")]
    pub password: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

// ---- scenario ----

#[derive(Args, Debug)]
pub struct ScenarioArgs {
    #[command(subcommand)]
    pub action: ScenarioAction,
}

#[derive(Subcommand, Debug)]
pub enum ScenarioAction {
    /// Validate a scenario file, assign an ID and persist it.
    Create {
        /// Scenario definition (JSON).
        file: PathBuf,
    },
    /// List persisted scenarios.
    List,
    /// Show one scenario with its validation history.
    Show {
        /// Scenario ID.
        id: String,
    },
}

// ---- config ----

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults), secrets redacted.
    Show {
        /// Show only one section (general, api, usage_cluster, state_cluster, usage,
        /// state, workload, runner, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["golden", "generate"]).expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.max_count, 1200);
                assert_eq!(args.max_offset, 3500);
                assert_eq!(args.max_interval, 3);
                assert_eq!(args.index_to_search_ratio, 4);
                assert!(args.output.is_none());
                assert!(args.seed.is_none());
            }
            _ => panic!("expected Generate command"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_generate_to_file() {
        let cli = Cli::try_parse_from([
            "golden", "generate", "--seed", "7", "-o", "load.jsonl", "--max-count", "10",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.output, Some(PathBuf::from("load.jsonl")));
                assert_eq!(args.max_count, 10);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn test_replay_requires_a_target() {
        let result = Cli::try_parse_from(["golden", "replay", "--log", "load.jsonl"]);
        assert!(result.is_err(), "url or cloud-id is required");
    }

    #[test]
    fn test_replay_rejects_both_targets() {
        let result = Cli::try_parse_from([
            "golden",
            "replay",
            "--log",
            "load.jsonl",
            "--url",
            "http://localhost:9200",
            "--cloud-id",
            "x:eQ==",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_replay_with_url() {
        let cli = Cli::try_parse_from([
            "golden",
            "replay",
            "--log",
            "load.jsonl",
            "--url",
            "http://localhost:9200",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.url.as_deref(), Some("http://localhost:9200"));
                assert_eq!(args.username, "elastic");
                assert_eq!(args.timeout_secs, 30);
            }
            _ => panic!("expected Replay command"),
        }
    }

    #[test]
    fn test_scenario_show() {
        let cli = Cli::try_parse_from(["golden", "--format", "json", "scenario", "show", "abc"])
            .expect("parse succeeded");
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Scenario(ScenarioArgs {
                action: ScenarioAction::Show { id },
            }) => assert_eq!(id, "abc"),
            _ => panic!("expected scenario show"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["golden", "config", "validate", "-c", "/etc/golden.toml"])
            .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/golden.toml"));
    }
}
