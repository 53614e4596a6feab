//! In-memory `CommandRunner` fake (testing only).
//!
//! Records every invocation and answers with a scripted exit code.

use super::{CommandRunner, ExecStatus};
use crate::core::error::EvalResult;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&Path, &[OsString]) -> i32 + Send + Sync>;

/// One recorded `run` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl RecordedCall {
    /// First argument as a string (the subcommand, e.g. `pull` or `plan`).
    pub fn subcommand(&self) -> Option<String> {
        self.args.first().map(|a| a.to_string_lossy().into_owned())
    }
}

/// Fake runner: no tools on `PATH` and every process exits 0 unless told otherwise.
pub struct RecordingRunner {
    tools: Vec<String>,
    responder: Responder,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            responder: Box::new(|_, _| 0),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `tool` is installed.
    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tools.push(tool.to_string());
        self
    }

    /// Decide each call's exit code. The responder may touch the filesystem.
    pub fn responding<F>(mut self, responder: F) -> Self
    where
        F: Fn(&Path, &[OsString]) -> i32 + Send + Sync + 'static,
    {
        self.responder = Box::new(responder);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> EvalResult<ExecStatus> {
        self.calls.lock().unwrap().push(RecordedCall {
            program: program.to_path_buf(),
            args: args.to_vec(),
        });
        Ok(ExecStatus {
            exit_code: (self.responder)(program, args),
        })
    }

    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools
            .iter()
            .any(|t| t == tool)
            .then(|| PathBuf::from("/usr/bin").join(tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::argv;

    #[test]
    fn test_ge012_records_calls() {
        let runner = RecordingRunner::new();
        runner.run(Path::new("a"), &argv(["pull", "x"])).unwrap();
        runner.run(Path::new("b"), &argv(["plan"])).unwrap();
        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, PathBuf::from("a"));
        assert_eq!(calls[0].subcommand().as_deref(), Some("pull"));
        assert_eq!(calls[1].subcommand().as_deref(), Some("plan"));
    }

    #[test]
    fn test_ge012_scripted_exit() {
        let runner = RecordingRunner::new().responding(|_, args| {
            if args.first().map(|a| a == "plan").unwrap_or(false) {
                3
            } else {
                0
            }
        });
        assert!(runner.run(Path::new("x"), &argv(["pull"])).unwrap().success());
        assert_eq!(
            runner.run(Path::new("x"), &argv(["plan"])).unwrap().exit_code,
            3
        );
    }

    #[test]
    fn test_ge012_locate() {
        let runner = RecordingRunner::new().with_tool("apptainer");
        assert_eq!(
            runner.locate("apptainer"),
            Some(PathBuf::from("/usr/bin/apptainer"))
        );
        assert_eq!(runner.locate("singularity"), None);
    }
}
