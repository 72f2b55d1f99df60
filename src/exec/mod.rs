use anyhow::{anyhow, Context, Result};
use fs_err as fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::errors::ReaperNlpError;

/// Names every generated script can rely on.
pub const PYTHON_PREAMBLE: &str = "import os\nimport reapy\nfrom reapy import reascript_api as RPR\n";

#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u128,
}

/// Runs generated code with the automation binding in scope.
///
/// There is no sandbox and no rollback: whatever the script does to the live
/// project stays done, and a failing script is an error for the caller.
pub trait ScriptRunner {
    fn run(&self, code: &str) -> Result<ScriptOutput>;
}

#[derive(Debug, Clone)]
pub struct PythonRunner {
    interpreter: PathBuf,
    preamble: String,
}

impl PythonRunner {
    pub fn new(interpreter: PathBuf) -> Self {
        Self::with_preamble(interpreter, PYTHON_PREAMBLE)
    }

    /// Like [`PythonRunner::new`] but prefixing scripts with `preamble` instead of the reapy imports.
    pub fn with_preamble(interpreter: PathBuf, preamble: impl Into<String>) -> Self {
        Self { interpreter, preamble: preamble.into() }
    }

    /// Resolve a bare interpreter name (`python3`) through `PATH`.
    pub fn locate(name: &str) -> Result<Self> {
        let candidate = Path::new(name);
        let interpreter = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            which::which(name).with_context(|| format!("python interpreter `{}` not found on PATH", name))?
        };
        Ok(Self::new(interpreter))
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }
}

impl ScriptRunner for PythonRunner {
    fn run(&self, code: &str) -> Result<ScriptOutput> {
        let script = tempfile::Builder::new()
            .prefix("reaper_nlp_")
            .suffix(".py")
            .tempfile()?;
        fs::write(script.path(), format!("{}\n{code}\n", self.preamble))?;

        log::debug!("running {} {}", self.interpreter.display(), script.path().display());
        let started = Instant::now();
        let out = Command::new(&self.interpreter)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn {}", self.interpreter.display()))?;

        let res = ScriptOutput {
            status: out.status.code().ok_or_else(|| anyhow!("python terminated by signal"))?,
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            duration_ms: started.elapsed().as_millis(),
        };

        if res.status != 0 {
            return Err(ReaperNlpError::ScriptFailed { status: res.status, stderr: res.stderr }.into());
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Skipped unless a python that can import the preamble is installed.
    fn runner_with_reapy() -> Option<PythonRunner> {
        let runner = PythonRunner::locate("python3").ok()?;
        let ok = Command::new(runner.interpreter())
            .args(["-c", PYTHON_PREAMBLE])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()?
            .success();
        ok.then_some(runner)
    }

    #[test]
    fn locate_keeps_absolute_paths() {
        let r = PythonRunner::locate("/opt/python/bin/python3").unwrap();
        assert_eq!(r.interpreter(), Path::new("/opt/python/bin/python3"));
    }

    #[test]
    fn locate_fails_for_unknown_interpreter() {
        assert!(PythonRunner::locate("definitely-not-a-python-binary").is_err());
    }

    fn tool(name: &str, preamble: &str) -> PythonRunner {
        let path = which::which(name).unwrap();
        PythonRunner::with_preamble(path, preamble)
    }

    #[test]
    fn script_file_holds_preamble_then_code() {
        // `cat` echoes the temp script back, exposing exactly what was written.
        let out = tool("cat", PYTHON_PREAMBLE).run("RPR.Main_OnCommand(40001, 0)").unwrap();
        assert_eq!(out.status, 0);
        assert!(out.stdout.starts_with(PYTHON_PREAMBLE));
        assert!(out.stdout.ends_with("\nRPR.Main_OnCommand(40001, 0)\n"));
    }

    #[test]
    fn failing_script_reports_status_and_stderr() {
        let err = tool("sh", "").run("echo boom >&2\nexit 3").unwrap_err();
        match err.downcast_ref::<ReaperNlpError>() {
            Some(ReaperNlpError::ScriptFailed { status, stderr }) => {
                assert_eq!(*status, 3);
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn successful_script_output_is_captured() {
        let out = tool("sh", "").run("echo hi").unwrap();
        assert_eq!(out.stdout.trim(), "hi");
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn new_uses_reapy_preamble() {
        let r = PythonRunner::new(PathBuf::from("/usr/bin/python3"));
        assert_eq!(r.preamble, PYTHON_PREAMBLE);
    }

    #[test]
    fn non_zero_exit_is_script_failure() {
        let Some(runner) = runner_with_reapy() else { return };
        let err = runner.run("raise SystemExit(3)").unwrap_err();
        match err.downcast_ref::<ReaperNlpError>() {
            Some(ReaperNlpError::ScriptFailed { status, .. }) => assert_eq!(*status, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn stdout_is_captured() {
        let Some(runner) = runner_with_reapy() else { return };
        let out = runner.run("print('hi')").unwrap();
        assert_eq!(out.stdout.trim(), "hi");
    }
}
