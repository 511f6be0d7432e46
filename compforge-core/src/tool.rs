//! External build tool invocation.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// A single external tool command line.
///
/// Output is inherited from the orchestrator so build logs stream straight
/// to the terminal.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Command line as a display string.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            command.current_dir(cwd);
        }
        command
    }

    /// Runs the command to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolSpawn`] if the program cannot be started and
    /// [`Error::ToolFailed`] if it exits unsuccessfully.
    pub fn run(&self) -> Result<()> {
        debug!(command = %self.display(), cwd = ?self.cwd, "Running");
        let status = self.command().status().map_err(|source| Error::ToolSpawn {
            command: self.display(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::ToolFailed {
                command: self.display(),
                status: status.code(),
            })
        }
    }

    /// Runs the command and returns its standard output.
    pub fn output(&self) -> Result<String> {
        debug!(command = %self.display(), cwd = ?self.cwd, "Capturing");
        let output = self.command().output().map_err(|source| Error::ToolSpawn {
            command: self.display(),
            source,
        })?;
        if !output.status.success() {
            return Err(Error::ToolFailed {
                command: self.display(),
                status: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cmd = ToolCommand::new("make").args(["install", "--jobs"]);
        assert_eq!(cmd.display(), "make install --jobs");
    }

    #[test]
    fn test_missing_program() {
        let err = ToolCommand::new("compforge-definitely-missing-tool")
            .run()
            .unwrap_err();
        assert!(matches!(err, Error::ToolSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit() {
        let err = ToolCommand::new("sh").args(["-c", "exit 3"]).run().unwrap_err();
        match err {
            Error::ToolFailed { status, .. } => assert_eq!(status, Some(3)),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_output() {
        let out = ToolCommand::new("sh").args(["-c", "echo pip 23.1"]).output().unwrap();
        assert_eq!(out.trim(), "pip 23.1");
    }
}
