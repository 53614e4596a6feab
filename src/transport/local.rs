//! GE-011: Local process execution with inherited stdio.

use super::interrupt::{pending_signal, Interrupt};
use super::{CommandRunner, ExecStatus};
use crate::core::error::{EvalError, EvalResult};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often a child is polled while an interrupt flag is watched.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Time a child gets to exit on its own after an interrupt before it is killed.
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Spawns real processes on this machine.
///
/// With an interrupt flag attached, a trapped signal ends the wait early and
/// `run` returns [`EvalError::Interrupted`] instead of the child's status.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner {
    interrupt: Option<Arc<AtomicUsize>>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interrupt(interrupt: &Interrupt) -> Self {
        Self {
            interrupt: Some(interrupt.flag()),
        }
    }

    fn pending(&self) -> Option<i32> {
        self.interrupt.as_deref().and_then(pending_signal)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> EvalResult<ExecStatus> {
        if let Some(signal) = self.pending() {
            return Err(EvalError::Interrupted { signal });
        }

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| EvalError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        let waited = match self.interrupt.as_deref() {
            Some(flag) => wait_interruptible(&mut child, flag),
            None => child.wait(),
        };
        let status = waited
            .map_err(|e| EvalError::io(format!("cannot wait for {}", program.display()), e))?;

        if let Some(signal) = self.pending() {
            tracing::warn!(signal, program = %program.display(), "interrupted");
            return Err(EvalError::Interrupted { signal });
        }
        Ok(ExecStatus {
            exit_code: exit_code_of(status),
        })
    }

    fn locate(&self, tool: &str) -> Option<PathBuf> {
        find_on_path(tool, std::env::var_os("PATH").as_deref())
    }
}

/// Wait for `child`, killing it once `KILL_GRACE` has passed since a signal
/// was recorded in `flag`.
fn wait_interruptible(child: &mut Child, flag: &AtomicUsize) -> io::Result<ExitStatus> {
    let mut deadline: Option<Instant> = None;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        match deadline {
            None if pending_signal(flag).is_some() => {
                deadline = Some(Instant::now() + KILL_GRACE);
            }
            Some(at) if Instant::now() >= at => {
                // Already-exited children make kill fail; wait reaps either way.
                let _ = child.kill();
                return child.wait();
            }
            _ => {}
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Search a `PATH`-style list for an executable called `tool`.
/// A name containing a separator is checked as-is.
pub fn find_on_path(tool: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if tool.is_empty() {
        return None;
    }
    if tool.contains(std::path::MAIN_SEPARATOR) {
        let candidate = PathBuf::from(tool);
        return is_executable(&candidate).then_some(candidate);
    }
    std::env::split_paths(path_var?)
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Exit code of a finished child. Death by signal maps to `128 + signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}
