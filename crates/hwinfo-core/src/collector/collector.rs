//! Main collector that combines the per-entity collectors.
//!
//! The `Collector` struct runs the requested sections and assembles an
//! [`Inventory`]. A section that fails is recorded in `Inventory::errors`
//! and does not stop the others.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::collector::error::CollectError;
use crate::collector::traits::{CommandOutput, CommandRunner, FileSystem};
use crate::model::{Inventory, Section, SectionError};

/// Where kernel interfaces are mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Base path to the proc filesystem (usually "/proc").
    pub proc_path: PathBuf,
    /// Base path to sysfs (usually "/sys").
    pub sys_path: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            sys_path: PathBuf::from("/sys"),
        }
    }
}

impl CollectorConfig {
    pub fn new(proc_path: impl Into<PathBuf>, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
            sys_path: sys_path.into(),
        }
    }
}

/// Timing information for each section.
///
/// Sections that were not requested stay at zero.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    pub total: Duration,
    pub system: Duration,
    pub cpu: Duration,
    pub ram: Duration,
    pub drives: Duration,
    pub network: Duration,
}

impl CollectorTiming {
    fn slot(&mut self, section: Section) -> &mut Duration {
        match section {
            Section::System => &mut self.system,
            Section::Cpu => &mut self.cpu,
            Section::Ram => &mut self.ram,
            Section::Drives => &mut self.drives,
            Section::Network => &mut self.network,
        }
    }
}

/// Hardware inventory collector.
///
/// Generic over the filesystem and the tool runner so that tests can use
/// [`MockFs`](crate::collector::MockFs) and
/// [`MockRunner`](crate::collector::MockRunner).
pub struct Collector<F: FileSystem, R: CommandRunner> {
    pub(crate) fs: F,
    pub(crate) runner: R,
    pub(crate) config: CollectorConfig,
    /// Timing information from the last collect_inventory call.
    last_timing: Option<CollectorTiming>,
}

impl<F: FileSystem, R: CommandRunner> Collector<F, R> {
    pub fn new(fs: F, runner: R, config: CollectorConfig) -> Self {
        Self {
            fs,
            runner,
            config,
            last_timing: None,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Returns timing information from the last collect_inventory call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Collects the given sections, in order. Duplicates are collected once.
    pub fn collect_inventory(&mut self, sections: &[Section]) -> Inventory {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();

        let mut inventory = Inventory {
            collected_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
            ..Default::default()
        };

        let mut done: Vec<Section> = Vec::with_capacity(sections.len());
        for &section in sections {
            if done.contains(&section) {
                continue;
            }
            done.push(section);

            let start = Instant::now();
            let result = match section {
                Section::System => self.collect_system().map(|v| inventory.system = Some(v)),
                Section::Cpu => self.collect_cpus().map(|v| inventory.cpus = Some(v)),
                Section::Ram => self.collect_ram().map(|v| inventory.ram = Some(v)),
                Section::Drives => self.collect_drives().map(|v| inventory.drives = Some(v)),
                Section::Network => self.collect_interfaces().map(|v| inventory.interfaces = Some(v)),
            };
            *timing.slot(section) = start.elapsed();
            debug!(%section, elapsed = ?start.elapsed(), "section collected");

            if let Err(e) = result {
                warn!(%section, error = %e, "section skipped");
                inventory.errors.push(SectionError {
                    section,
                    message: e.to_string(),
                });
            }
        }

        timing.total = total_start.elapsed();
        self.last_timing = Some(timing);
        inventory
    }

    /// Runs a tool and returns its output whatever the exit status.
    pub(crate) fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CollectError> {
        debug!(program, ?args, "running");
        self.runner
            .run(program, args)
            .map_err(|source| CollectError::Spawn {
                program: program.to_string(),
                source,
            })
    }

    /// Runs a tool and fails unless it exits with status 0.
    pub(crate) fn run_checked(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CollectError> {
        let output = self.run(program, args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(command_error(program, &output))
        }
    }

    pub(crate) fn read_file(&self, path: &Path) -> Result<String, CollectError> {
        self.fs
            .read_to_string(path)
            .map_err(|source| CollectError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

pub(crate) fn command_error(program: &str, output: &CommandOutput) -> CollectError {
    CollectError::Command {
        program: program.to_string(),
        code: output.code.unwrap_or(-1),
        stderr: output.stderr.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockFs, MockRunner};

    #[test]
    fn test_collect_inventory_typical_workstation() {
        let mut collector = Collector::new(
            MockFs::typical_workstation(),
            MockRunner::typical_workstation(),
            CollectorConfig::default(),
        );
        let inventory = collector.collect_inventory(&Section::ALL);

        assert!(inventory.errors.is_empty(), "{:?}", inventory.errors);
        assert!(inventory.collected_at > 0);
        assert_eq!(inventory.system.as_ref().unwrap().vendor, "LENOVO");
        assert_eq!(inventory.cpus.as_ref().unwrap().len(), 2);
        assert_eq!(inventory.ram.as_ref().unwrap().modules.len(), 4);
        assert_eq!(inventory.drives.as_ref().unwrap().len(), 2);
        assert_eq!(inventory.interfaces.as_ref().unwrap().len(), 3);
        assert!(collector.last_timing().is_some());
    }

    #[test]
    fn test_collect_inventory_only_requested_sections() {
        let mut collector = Collector::new(
            MockFs::typical_workstation(),
            MockRunner::typical_workstation(),
            CollectorConfig::default(),
        );
        let inventory = collector.collect_inventory(&[Section::Cpu, Section::Cpu]);

        assert!(inventory.cpus.is_some());
        assert!(inventory.system.is_none());
        assert!(inventory.ram.is_none());
        assert!(collector.runner().calls().is_empty());
    }

    #[test]
    fn test_failed_section_is_recorded() {
        let mut collector = Collector::new(MockFs::new(), MockRunner::new(), CollectorConfig::default());
        let inventory = collector.collect_inventory(&[Section::Ram, Section::Cpu]);

        assert!(!inventory.has_data());
        assert_eq!(inventory.errors.len(), 2);
        assert_eq!(inventory.errors[0].section, Section::Ram);
        assert!(inventory.errors[0].message.contains("dmidecode"));
        assert_eq!(inventory.errors[1].section, Section::Cpu);
        assert!(inventory.errors[1].message.contains("cpuinfo"));
    }

    #[test]
    fn test_run_checked_reports_exit_status() {
        let mut runner = MockRunner::new();
        runner.add(
            "dmidecode -t 1",
            CommandOutput {
                stdout: String::new(),
                stderr: "/dev/mem: Permission denied\n".into(),
                code: Some(1),
            },
        );
        let collector = Collector::new(MockFs::new(), runner, CollectorConfig::default());
        let err = collector.run_checked("dmidecode", &["-t", "1"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "dmidecode exited with status 1: /dev/mem: Permission denied"
        );
    }
}
