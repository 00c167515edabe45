//! hwinfo - hardware inventory of the running machine.
//!
//! Collects system identity, CPUs, memory, drives and network interfaces
//! from OS diagnostic tools and prints them as text or JSON.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(not(target_os = "linux"))]
use hwinfo_core::collector::{MockFs, MockRunner};
#[cfg(target_os = "linux")]
use hwinfo_core::collector::{RealFs, RealRunner};
use hwinfo_core::collector::{Collector, CollectorConfig, CommandRunner, FileSystem};
use hwinfo_core::model::Section;
use hwinfo_core::size::Unit;

use crate::report::{Report, WifiStatus};

/// Hardware inventory of the running machine.
#[derive(Parser)]
#[command(name = "hwinfo", about = "Hardware inventory of the running machine", version)]
struct Args {
    /// Section to collect (repeatable). Default is all sections.
    #[arg(short, long = "section", value_enum, value_name = "SECTION")]
    sections: Vec<SectionArg>,

    /// Output as JSON.
    #[arg(long)]
    json: bool,

    /// Unit for memory sizes in the text report.
    #[arg(long, value_enum, default_value = "auto")]
    ram_unit: RamUnit,

    /// Also check whether wireless interfaces see access points and are
    /// hard-blocked (runs iwlist and rfkill).
    #[arg(long)]
    check_wifi: bool,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: PathBuf,

    /// Path to /sys filesystem (for testing/mocking).
    #[arg(long, default_value = "/sys")]
    sys_path: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SectionArg {
    System,
    Cpu,
    Ram,
    Drives,
    Network,
}

impl From<SectionArg> for Section {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::System => Section::System,
            SectionArg::Cpu => Section::Cpu,
            SectionArg::Ram => Section::Ram,
            SectionArg::Drives => Section::Drives,
            SectionArg::Network => Section::Network,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RamUnit {
    /// Largest unit that shows the exact size.
    Auto,
    Kb,
    Mb,
    Gb,
}

impl RamUnit {
    fn unit(self) -> Option<Unit> {
        match self {
            RamUnit::Auto => None,
            RamUnit::Kb => Some(Unit::KB),
            RamUnit::Mb => Some(Unit::MB),
            RamUnit::Gb => Some(Unit::GB),
        }
    }
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Logs go to stderr so that reports on stdout stay machine-readable.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("hwinfo={}", level).parse().expect("valid directive"))
        .add_directive(format!("hwinfo_core={}", level).parse().expect("valid directive"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = CollectorConfig::new(&args.proc_path, &args.sys_path);
    debug!(proc = %config.proc_path.display(), sys = %config.sys_path.display(), "paths");

    #[cfg(target_os = "linux")]
    let collector = Collector::new(RealFs::new(), RealRunner::new(), config);
    #[cfg(not(target_os = "linux"))]
    let collector = {
        warn!("not running on Linux, reporting the built-in demo workstation");
        Collector::new(
            MockFs::typical_workstation(),
            MockRunner::typical_workstation(),
            config,
        )
    };

    run(collector, &args)
}

fn run<F: FileSystem, R: CommandRunner>(mut collector: Collector<F, R>, args: &Args) -> ExitCode {
    let sections: Vec<Section> = if args.sections.is_empty() {
        Section::ALL.to_vec()
    } else {
        args.sections.iter().map(|&s| s.into()).collect()
    };

    info!("hwinfo {} collecting {} section(s)", env!("CARGO_PKG_VERSION"), sections.len());
    let inventory = collector.collect_inventory(&sections);
    if let Some(timing) = collector.last_timing() {
        debug!(total = ?timing.total, "collection finished");
    }

    let wifi = if args.check_wifi {
        wifi_status(&collector, inventory.interfaces.as_deref().unwrap_or_default())
    } else {
        Vec::new()
    };

    let report = Report {
        inventory: &inventory,
        wifi,
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to serialize inventory: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report::render_text(&report, args.ram_unit.unit()));
        for err in &inventory.errors {
            eprintln!("{}: {}", err.section, err.message);
        }
    }

    if inventory.has_data() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn wifi_status<F: FileSystem, R: CommandRunner>(
    collector: &Collector<F, R>,
    interfaces: &[hwinfo_core::model::InterfaceInfo],
) -> Vec<WifiStatus> {
    let wireless: Vec<_> = interfaces.iter().filter(|i| i.is_wireless()).collect();
    if wireless.is_empty() {
        return Vec::new();
    }

    let hard_blocked = collector
        .is_hard_blocked()
        .inspect_err(|e| warn!(error = %e, "rfkill check failed"))
        .ok();

    wireless
        .into_iter()
        .map(|iface| WifiStatus {
            device: iface.device.clone(),
            can_scan: collector
                .can_scan(iface)
                .inspect_err(|e| warn!(device = %iface.device, error = %e, "scan failed"))
                .ok(),
            hard_blocked,
        })
        .collect()
}
