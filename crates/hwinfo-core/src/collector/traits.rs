//! Abstractions over file reads and tool execution.
//!
//! Collectors never touch `std::fs` or `std::process` directly. They go
//! through [`FileSystem`] and [`CommandRunner`], so every collector can run
//! against the in-memory fakes in [`crate::collector::mock`].

use std::io;
use std::path::Path;
use std::process::Command;

/// Read-only filesystem access.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Captured result of running an external tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Output of a process that exited with status 0.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::with_code(stdout, 0)
    }

    pub fn with_code(stdout: impl Into<String>, code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout split into lines, without line terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines()
    }
}

/// Runs external diagnostic tools.
///
/// `Err` means the program could not be started at all. A program that ran
/// and exited non-zero is still `Ok`; callers inspect [`CommandOutput::code`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Runs tools with `std::process::Command`, capturing both streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealRunner;

impl RealRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }
}
