//! Latent-marginal core CLI.
//!
//! Small diagnostic front end for the noncompliance case study:
//! - `check` loads and validates a trial table and prior configuration
//! - `eval` evaluates the log-posterior (optionally with the gradient on the
//!   unconstrained scale) at one parameter point
//!
//! stdout carries only the JSON payload; all logging goes to stderr.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lm_common::Error;
use lm_config::{ComplianceTrial, ModelPriors};
use lm_core::gradient::numerical_gradient;
use lm_core::model::config_error;
use lm_core::models::NoncomplianceModel;
use lm_core::posterior::is_rejection;
use lm_core::{LatentClassModel, LogPosterior, UnconstrainedPosterior};

/// Latent-class marginal likelihood evaluation
#[derive(Parser)]
#[command(name = "lm-core")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a trial table and prior configuration
    Check {
        /// Path to the trial table (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Path to the prior configuration (JSON); defaults to flat priors
        #[arg(long)]
        priors: Option<PathBuf>,
    },

    /// Evaluate the log-posterior at one parameter point
    Eval {
        /// Path to the trial table (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Path to the prior configuration (JSON); defaults to flat priors
        #[arg(long)]
        priors: Option<PathBuf>,

        /// Comma-separated parameter values on the natural (constrained) scale
        #[arg(long)]
        params: String,

        /// Also report the gradient on the unconstrained scale
        #[arg(long)]
        gradient: bool,
    },
}

/// Payload of `check`, printed to stdout as JSON.
#[derive(Serialize)]
struct CheckReport {
    groups: usize,
    parameters: usize,
    schema_version: String,
}

/// Payload of `eval`, printed to stdout as JSON.
#[derive(Serialize)]
struct EvalReport {
    /// None when the point was rejected.
    log_posterior: Option<f64>,
    rejected: bool,
    /// Gradient on the unconstrained scale, when requested.
    gradient: Option<Vec<f64>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}/{}]: {err}", err.category(), err.code());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Error> {
    match command {
        Commands::Check { data, priors } => {
            let model = load_model(&data, priors.as_deref())?;
            let report = CheckReport {
                groups: model.trial().groups.len(),
                parameters: model.priors().dim(),
                schema_version: model.priors().schema_version.clone(),
            };
            println!("{}", serde_json::to_string(&report)?);
            Ok(())
        }
        Commands::Eval {
            data,
            priors,
            params,
            gradient,
        } => {
            let model = load_model(&data, priors.as_deref())?;
            let params = parse_params(&params)?;
            let posterior = LogPosterior::new(model)?;

            let value = posterior.log_posterior(&params);
            let rejected = is_rejection(value);

            let gradient_value = if gradient && !rejected {
                let unconstrained = UnconstrainedPosterior::new(posterior);
                let at = unconstrained.unconstrain(&params);
                Some(numerical_gradient(&unconstrained, &at))
            } else {
                None
            };

            let report = EvalReport {
                log_posterior: if rejected { None } else { Some(value) },
                rejected,
                gradient: gradient_value,
            };
            println!("{}", serde_json::to_string(&report)?);
            Ok(())
        }
    }
}

fn load_model(data: &Path, priors: Option<&Path>) -> Result<NoncomplianceModel, Error> {
    let trial = ComplianceTrial::load(data).map_err(config_error)?;
    let priors = match priors {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<ModelPriors>(&text)?
        }
        None => NoncomplianceModel::default_priors(),
    };
    tracing::info!(
        groups = trial.groups.len(),
        parameters = priors.dim(),
        "loaded trial and priors"
    );
    NoncomplianceModel::new(trial, priors)
}

fn parse_params(text: &str) -> Result<Vec<f64>, Error> {
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| Error::Config(format!("invalid parameter value '{part}': {e}")))
        })
        .collect()
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
