//! GE-020: Planner image cache. Pulled once, then reused.
//!
//! The image is pulled into a staging directory beside the cache path and
//! renamed into place, so the cache path only ever holds a complete image.

use crate::core::config::EvalConfig;
use crate::core::error::{EvalError, EvalResult};
use crate::transport::{argv, display_command, CommandRunner};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Return the cached planner image, pulling it first if absent.
pub fn ensure_artifact(config: &EvalConfig, runner: &dyn CommandRunner) -> EvalResult<PathBuf> {
    let dest = &config.artifact_path;
    if dest.exists() {
        tracing::debug!(artifact = %dest.display(), "planner image cached");
        return runnable_path(dest);
    }

    println!("Goose apptainer image does not exist, downloading...");
    let tool = runner
        .locate(&config.container_tool)
        .ok_or_else(|| EvalError::ToolNotFound {
            tool: config.container_tool.clone(),
        })?;
    pull(config, runner, &tool)?;
    runnable_path(dest)
}

/// A bare relative name would be looked up on `PATH` when spawned.
fn runnable_path(path: &Path) -> EvalResult<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| EvalError::io(format!("cannot resolve {}", path.display()), e))
}

fn pull(config: &EvalConfig, runner: &dyn CommandRunner, tool: &Path) -> EvalResult<()> {
    let dest = &config.artifact_path;
    let fetch_error = |detail: String, exit_code: Option<i32>| EvalError::ArtifactFetch {
        reference: config.image_reference.clone(),
        dest: dest.clone(),
        detail,
        exit_code,
    };

    let file_name = dest
        .file_name()
        .ok_or_else(|| EvalError::Config(format!("{} is not a file path", dest.display())))?;
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|e| EvalError::io(format!("cannot create {}", parent.display()), e))?;

    // Dropped on every exit path, taking any partial pull with it.
    let staging = tempfile::Builder::new()
        .prefix(".goose-pull-")
        .tempdir_in(parent)
        .map_err(|e| EvalError::io(format!("cannot stage pull in {}", parent.display()), e))?;
    let staged = staging.path().join(file_name);

    let args = argv([
        OsString::from("pull"),
        staged.clone().into_os_string(),
        OsString::from(&config.image_reference),
    ]);
    tracing::info!(command = %display_command(tool, &args), "pulling planner image");

    let status = runner.run(tool, &args)?;
    if !status.success() {
        return Err(fetch_error(
            format!("{} pull exited with status {}", tool.display(), status.exit_code),
            Some(status.exit_code),
        ));
    }
    if !staged.is_file() {
        return Err(fetch_error("pull reported success but wrote no image".to_string(), None));
    }

    std::fs::rename(&staged, dest).map_err(|e| {
        EvalError::io(
            format!("cannot move {} to {}", staged.display(), dest.display()),
            e,
        )
    })?;
    tracing::info!(artifact = %dest.display(), "planner image pulled");
    Ok(())
}
