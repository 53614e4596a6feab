//! GE-001: Types shared by the evaluation phases.
//!
//! An evaluation is a request (three input paths), an options descriptor
//! written next to the model parameters, and the bundle layout inside the
//! scratch directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Request
// ============================================================================

/// The three user-supplied inputs of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRequest {
    /// PDDL domain file
    pub domain: PathBuf,

    /// PDDL problem file
    pub problem: PathBuf,

    /// Trained model parameters file
    pub model: PathBuf,
}

impl EvalRequest {
    pub fn new(
        domain: impl Into<PathBuf>,
        problem: impl Into<PathBuf>,
        model: impl Into<PathBuf>,
    ) -> Self {
        Self {
            domain: domain.into(),
            problem: problem.into(),
            model: model.into(),
        }
    }
}

/// Which input a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Domain,
    Problem,
    Model,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Domain => write!(f, "Domain PDDL"),
            InputKind::Problem => write!(f, "Problem PDDL"),
            InputKind::Model => write!(f, "Model"),
        }
    }
}

// ============================================================================
// Options descriptor
// ============================================================================

/// How the planner should interpret the model parameters.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    pub mode: String,
    pub policy_type: String,
    pub state_representation: String,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            mode: "wlf".to_string(),
            policy_type: "search".to_string(),
            state_representation: "downward".to_string(),
        }
    }
}

// ============================================================================
// Bundle layout
// ============================================================================

/// File names of the generated model bundle inside a scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBundle {
    /// `<tag>.model.params`: byte copy of the model parameters
    pub params: PathBuf,

    /// `<tag>.model.opts`: the options descriptor line
    pub options: PathBuf,

    /// `<tag>.model`: the zip handed to the planner
    pub archive: PathBuf,
}

impl ModelBundle {
    /// Derive the bundle paths for a domain tag under `dir`.
    pub fn layout(dir: &Path, tag: &str) -> Self {
        Self {
            params: dir.join(format!("{tag}.model.params")),
            options: dir.join(format!("{tag}.model.opts")),
            archive: dir.join(format!("{tag}.model")),
        }
    }
}
