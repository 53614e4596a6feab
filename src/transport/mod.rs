//! GE-010: Process execution seam: system runner and recording fake.

pub mod interrupt;
pub mod local;
#[cfg(test)]
pub mod recording;

use crate::core::error::EvalResult;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Exit status of a finished subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecStatus {
    pub exit_code: i32,
}

impl ExecStatus {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs for the evaluator.
///
/// Children inherit stdin/stdout/stderr; nothing is captured.
pub trait CommandRunner {
    /// Run `program` with `args` and block until it exits.
    fn run(&self, program: &Path, args: &[OsString]) -> EvalResult<ExecStatus>;

    /// Resolve a command name to an executable on `PATH`.
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Build an argument vector from mixed string and path parts.
pub fn argv<I, S>(parts: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    parts.into_iter().map(Into::into).collect()
}

/// Render a command line for logs.
pub fn display_command(program: &Path, args: &[OsString]) -> String {
    let mut line = program.display().to_string();
    for a in args {
        line.push(' ');
        line.push_str(&a.to_string_lossy());
    }
    line
}
