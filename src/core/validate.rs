//! GE-004: Input validation. Read-only checks before any side effect.

use super::error::{EvalError, EvalResult};
use super::types::{EvalRequest, InputKind};
use std::path::Path;

/// Check that all three inputs exist and the model is not a directory.
///
/// Checks run in argument order and stop at the first failure.
pub fn check_inputs(req: &EvalRequest) -> EvalResult<()> {
    require_exists(InputKind::Domain, &req.domain)?;
    require_exists(InputKind::Problem, &req.problem)?;
    require_exists(InputKind::Model, &req.model)?;
    if req.model.is_dir() {
        return Err(EvalError::InvalidInput {
            path: req.model.clone(),
        });
    }
    tracing::debug!(
        domain = %req.domain.display(),
        problem = %req.problem.display(),
        model = %req.model.display(),
        "inputs validated"
    );
    Ok(())
}

fn require_exists(kind: InputKind, path: &Path) -> EvalResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(EvalError::MissingFile {
            kind,
            path: path.to_path_buf(),
        })
    }
}
