//! GE-002: Error taxonomy for an evaluation run.

use super::types::InputKind;
use std::path::PathBuf;

/// Everything that can abort an evaluation. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("{kind} file {} does not exist.", .path.display())]
    MissingFile { kind: InputKind, path: PathBuf },

    #[error("Model path {} is a directory, expected a file.", .path.display())]
    InvalidInput { path: PathBuf },

    #[error("The command `{tool}` was not found. Please install with sudo apt install -y {tool}")]
    ToolNotFound { tool: String },

    #[error("failed to pull {reference} into {}: {detail}", .dest.display())]
    ArtifactFetch {
        reference: String,
        dest: PathBuf,
        detail: String,
        exit_code: Option<i32>,
    },

    #[error("planner exited with status {exit_code}")]
    PlannerExecution { exit_code: i32 },

    #[error("interrupted by signal {signal}")]
    Interrupted { signal: i32 },

    #[error("failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("cannot encode model options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EvalError {
    /// Wrap an I/O error with a human-readable context line.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        EvalError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status for this error.
    ///
    /// Subprocess failures pass the child's status through and a trapped
    /// signal maps to `128 + signal`; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            EvalError::PlannerExecution { exit_code } if *exit_code != 0 => *exit_code,
            EvalError::ArtifactFetch {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            EvalError::Interrupted { signal } => 128 + signal,
            _ => 1,
        }
    }
}

/// Result alias used across the crate.
pub type EvalResult<T> = Result<T, EvalError>;
