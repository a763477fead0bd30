//! `golden generate` command handler

use std::fs::File;
use std::io::{BufWriter, Write};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use golden_core::config::WorkloadConfig;
use golden_workload::{Generator, GeneratorConfig, OperationFactory};

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `generate` command.
///
/// The log goes to `--output` when given (followed by a short report on
/// stdout), otherwise straight to stdout.
pub fn execute(args: GenerateArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let generator = build_generator(&args)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            let records = generator.write_jsonl(&mut rng, BufWriter::new(file))?;
            info!(records, path = %path.display(), "workload log written");
            writer.render(&GenerateReport {
                records,
                destination: path.display().to_string(),
            })
        }
        None => {
            let stdout = std::io::stdout();
            let records = generator.write_jsonl(&mut rng, stdout.lock())?;
            info!(records, "workload log written to stdout");
            Ok(())
        }
    }
}

/// Builds the generator described by the command-line flags.
pub fn build_generator(args: &GenerateArgs) -> Result<Generator, CliError> {
    let config = GeneratorConfig {
        start_offset_seconds: args.start_offset,
        max_count: args.max_count,
        max_offset_seconds: args.max_offset,
        min_interval_seconds: args.min_interval,
        max_interval_seconds: args.max_interval,
        index_to_search_ratio: args.index_to_search_ratio,
    };
    let targets = WorkloadConfig {
        search_target: args.search_target.clone(),
        index_target: args.index_target.clone(),
    };
    Ok(Generator::new(config)?.with_factory(OperationFactory::from_config(&targets)))
}

/// Summary of a log written to a file.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub records: u64,
    pub destination: String,
}

impl Render for GenerateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Wrote {} records to {}", self.records, self.destination)
    }
}
