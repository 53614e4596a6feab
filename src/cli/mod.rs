//! GE-050: Command-line surface: three positionals, no flags.

use crate::core::config::EvalConfig;
use crate::core::error::EvalResult;
use crate::core::evaluator;
use crate::core::types::EvalRequest;
use crate::telemetry;
use crate::transport::interrupt::Interrupt;
use crate::transport::local::SystemRunner;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "goose-eval",
    version,
    about = "Evaluate a trained model on a dataset."
)]
pub struct Cli {
    /// Path to the domain PDDL file.
    pub domain_pddl: PathBuf,

    /// Path to the problem PDDL file.
    pub problem_pddl: PathBuf,

    /// Path to the trained model file.
    pub model_path: PathBuf,
}

impl Cli {
    pub fn request(&self) -> EvalRequest {
        EvalRequest::new(
            self.domain_pddl.clone(),
            self.problem_pddl.clone(),
            self.model_path.clone(),
        )
    }
}

/// Resolve configuration, start logging and run the evaluation.
///
/// Termination signals are trapped for the whole run so scratch and staging
/// directories are removed before the process exits.
pub fn run(cli: &Cli) -> EvalResult<()> {
    let config = EvalConfig::from_env()?;
    telemetry::init_tracing(config.log_json, tracing::Level::WARN);
    tracing::debug!(?config, "configuration resolved");
    let interrupt = Interrupt::install()?;
    evaluator::evaluate(
        &cli.request(),
        &config,
        &SystemRunner::with_interrupt(&interrupt),
    )
}
