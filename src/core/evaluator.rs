//! GE-030: Evaluation run, start to finish.
//!
//! Every phase blocks until done. The scratch directory lives exactly as
//! long as `evaluate` and is removed on success and on every error.

use super::archive;
use super::config::EvalConfig;
use super::error::{EvalError, EvalResult};
use super::types::{EvalRequest, ModelOptions};
use super::validate;
use crate::artifact;
use crate::transport::{argv, display_command, CommandRunner};
use std::ffi::OsString;
use std::path::Path;

/// Run one evaluation end to end.
pub fn evaluate(
    req: &EvalRequest,
    config: &EvalConfig,
    runner: &dyn CommandRunner,
) -> EvalResult<()> {
    validate::check_inputs(req)?;
    let planner = artifact::ensure_artifact(config, runner)?;

    let scratch = scratch_dir(config)?;
    let bundle = archive::build_model_archive(
        scratch.path(),
        &config.domain_tag,
        &req.model,
        &ModelOptions::default(),
    )?;

    run_planner(runner, &planner, req, &bundle.archive)
}

fn scratch_dir(config: &EvalConfig) -> EvalResult<tempfile::TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("goose-eval-");
    let dir = match &config.scratch_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(|e| EvalError::io("cannot create scratch directory", e))?;
    tracing::debug!(scratch = %dir.path().display(), "scratch directory created");
    Ok(dir)
}

/// `<planner> plan <domain> <problem> -m <archive>`
pub fn planner_args(req: &EvalRequest, archive: &Path) -> Vec<OsString> {
    argv([
        OsString::from("plan"),
        req.domain.clone().into_os_string(),
        req.problem.clone().into_os_string(),
        OsString::from("-m"),
        archive.as_os_str().to_os_string(),
    ])
}

fn run_planner(
    runner: &dyn CommandRunner,
    planner: &Path,
    req: &EvalRequest,
    archive: &Path,
) -> EvalResult<()> {
    let args = planner_args(req, archive);
    tracing::info!(command = %display_command(planner, &args), "running planner");

    let status = runner.run(planner, &args)?;
    if !status.success() {
        tracing::warn!(exit_code = status.exit_code, "planner failed");
        return Err(EvalError::PlannerExecution {
            exit_code: status.exit_code,
        });
    }
    tracing::info!("planner finished");
    Ok(())
}
