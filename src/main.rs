//! er-grade - grade ER diagram exports against a reference solution
//!
//! Prints one JSON outcome per submission to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use er_grader::error::ExitCode as GradeExitCode;
use er_grader::{logging, Grader, GradingConfig, GradingError};

#[derive(Parser, Debug)]
#[command(name = "er-grade", version, about = "Grade ER diagram exports against a reference solution")]
struct Cli {
    /// Reference solution export (may carry `points` or `punkte`)
    #[arg(long, short, env = "ER_GRADER_SOLUTION")]
    solution: PathBuf,

    /// TOML grading configuration
    #[arg(long, short, env = "ER_GRADER_CONFIG")]
    config: Option<PathBuf>,

    /// Submission exports to grade
    #[arg(required = true)]
    submissions: Vec<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Log level or filter directive (e.g. `info`, `er_grader=trace`)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn setup(cli: &Cli) -> Result<Grader, GradingError> {
    let config = match &cli.config {
        Some(path) => GradingConfig::load(path)?,
        None => GradingConfig::default(),
    };
    Grader::new(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let grader = match setup(&cli) {
        Ok(grader) => grader,
        Err(e) => {
            eprintln!("{}", e.to_json());
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let reference = match grader.load_reference(&cli.solution) {
        Ok(reference) => reference,
        Err(e) => {
            eprintln!("{}", e.to_json());
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let outcomes = grader.grade_files(&cli.submissions, &reference);
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&outcomes)
    } else {
        serde_json::to_string(&outcomes)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: cannot render results: {}", e);
            return ExitCode::from(GradeExitCode::Failure as u8);
        }
    }

    if outcomes.iter().all(|o| o.is_success()) {
        ExitCode::from(GradeExitCode::Success as u8)
    } else {
        ExitCode::from(GradeExitCode::Failure as u8)
    }
}
