use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use erdgen_core::{
    process_schema_with, ComplexityThresholds, CyclePolicy, Error as CoreError, ProcessedSchema,
    Schema,
};
use erdgen_synth::output::csv::write_dataset_csv;
use erdgen_synth::{SynthesisError, SynthesisOptions, Synthesizer};

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read schema: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),
}

#[derive(Parser, Debug)]
#[command(name = "erdgen", version, about = "Schema-driven synthetic data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a schema and print its metadata and generation order.
    Validate(ValidateArgs),
    /// Generate a referentially consistent dataset as one CSV per table.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to the schema JSON produced by the diagram parser.
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,
    /// Treat foreign-key cycles as a hard failure.
    #[arg(long, value_enum, default_value_t = CyclePolicyArg::Drop)]
    cycle_policy: CyclePolicyArg,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the schema JSON produced by the diagram parser.
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,
    /// Directory where run artifacts are written.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Run seed; the same seed reproduces the same dataset.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Rows per ordinary table.
    #[arg(long, default_value_t = 10)]
    rows: u64,
    /// Rows per reference/lookup table.
    #[arg(long, default_value_t = 5)]
    reference_rows: u64,
    /// Treat foreign-key cycles as a hard failure.
    #[arg(long, value_enum, default_value_t = CyclePolicyArg::Drop)]
    cycle_policy: CyclePolicyArg,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CyclePolicyArg {
    Drop,
    Error,
}

impl From<CyclePolicyArg> for CyclePolicy {
    fn from(value: CyclePolicyArg) -> Self {
        match value {
            CyclePolicyArg::Drop => CyclePolicy::Drop,
            CyclePolicyArg::Error => CyclePolicy::Error,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Validate(args) => validate(args),
        Command::Generate(args) => generate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_processed(path: &PathBuf, policy: CyclePolicy) -> Result<ProcessedSchema, CliError> {
    let contents = fs::read_to_string(path)?;
    let schema: Schema = serde_json::from_str(&contents)
        .map_err(|err| CoreError::InvalidSchema(err.to_string()))?;
    let processed = process_schema_with(schema, &ComplexityThresholds::default(), policy)?;
    Ok(processed)
}

fn validate(args: ValidateArgs) -> Result<(), CliError> {
    let processed = load_processed(&args.schema, args.cycle_policy.into())?;

    println!(
        "tables: {}  columns: {}  relationships: {}  complexity: {:?}",
        processed.metadata.table_count,
        processed.metadata.total_columns,
        processed.metadata.relationship_count,
        processed.metadata.complexity,
    );
    println!("generation order: {}", processed.dependency_order.join(" -> "));
    if !processed.excluded_tables.is_empty() {
        println!(
            "excluded (cycle): {}",
            processed.excluded_tables.join(", ")
        );
    }

    if processed.validation_errors.is_empty() {
        println!("schema is consistent");
    } else {
        // Validation problems are informational: the schema stays usable.
        println!("{} problem(s) found:", processed.validation_errors.len());
        for error in &processed.validation_errors {
            println!("  - {error}");
        }
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let processed = load_processed(&args.schema, args.cycle_policy.into())?;

    let options = SynthesisOptions {
        seed: args.seed,
        default_rows: args.rows,
        reference_rows: args.reference_rows,
        ..SynthesisOptions::default()
    };

    let mut result = Synthesizer::new(options).run(&processed);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ");
    let run_dir = args
        .out
        .join(format!("{timestamp}__run_{}", result.report.run_id));
    fs::create_dir_all(&run_dir)?;

    let schema_path = run_dir.join("processed_schema.json");
    fs::write(&schema_path, serde_json::to_vec_pretty(&processed)?)?;

    result.report.bytes_written = write_dataset_csv(&run_dir, &processed, &result.dataset)?;

    let report_path = run_dir.join("synthesis_report.json");
    fs::write(&report_path, serde_json::to_vec_pretty(&result.report)?)?;

    info!(
        run_dir = %run_dir.display(),
        tables = result.report.tables.len(),
        bytes_written = result.report.bytes_written,
        "run artifacts written"
    );
    println!("wrote {} table(s) to {}", result.report.tables.len(), run_dir.display());

    Ok(())
}
