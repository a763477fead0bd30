//! CLI argument definitions for golden-daemon.

use std::path::PathBuf;

use clap::Parser;

/// Golden deployment validator daemon.
///
/// Resumes active scenarios, keeps their workload and validation loops
/// running and drains them on SIGTERM/SIGINT.
#[derive(Parser, Debug)]
#[command(name = "golden-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to golden.toml configuration file.
    #[arg(short, long, default_value = "/etc/golden/golden.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,

    /// Override PID file path (takes precedence over config file).
    #[arg(long)]
    pub pid_file: Option<String>,

    /// Do not resume scenarios that were running before the last shutdown.
    #[arg(long)]
    pub no_resume: bool,
}
