//! Scripted command runner for testing collectors without the real tools.

use crate::collector::traits::{CommandOutput, CommandRunner};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

/// Returns canned output keyed by the full command line.
///
/// Command lines are the program and its arguments joined by single spaces,
/// e.g. `"dmidecode -t 16,17"`. Unknown commands fail as if the program were
/// not installed. Every invocation is recorded, see [`MockRunner::calls`].
#[derive(Debug, Default)]
pub struct MockRunner {
    outputs: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a successful run printing `stdout`.
    pub fn add_output(&mut self, command_line: &str, stdout: impl Into<String>) {
        self.add(command_line, CommandOutput::ok(stdout));
    }

    /// Registers an arbitrary result for `command_line`.
    pub fn add(&mut self, command_line: &str, output: CommandOutput) {
        self.outputs.insert(command_line.to_string(), output);
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let command_line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command_line.clone());
        }
        self.outputs.get(&command_line).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no scripted output for {:?}", command_line),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_returns_scripted_output() {
        let mut runner = MockRunner::new();
        runner.add_output("dmidecode -t 1", "System Information\n");
        runner.add("laptop-detect", CommandOutput::with_code("", 1));

        let out = runner.run("dmidecode", &["-t", "1"]).unwrap();
        assert_eq!(out.stdout, "System Information\n");
        assert!(out.success());

        let out = runner.run("laptop-detect", &[]).unwrap();
        assert_eq!(out.code, Some(1));

        assert_eq!(runner.calls(), ["dmidecode -t 1", "laptop-detect"]);
    }

    #[test]
    fn test_mock_runner_unknown_command() {
        let runner = MockRunner::new();
        let err = runner.run("smartctl", &["-i", "/dev/sda"]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(runner.calls(), ["smartctl -i /dev/sda"]);
    }
}
