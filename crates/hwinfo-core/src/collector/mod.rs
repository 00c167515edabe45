//! Hardware collection on Linux.
//!
//! Each entity family has its own module that turns tool output into typed
//! records from [`crate::model`]. All text goes through the extractor in
//! [`parser`]; sizes go through [`crate::size`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Collector                           │
//! │   system    cpu     memory     drive      network            │
//! │     │        │        │          │           │               │
//! │     └────────┴───► parser (normalize_line, split_records)    │
//! │                                                              │
//! │      ┌──────────────┐            ┌────────────────┐          │
//! │      │  FileSystem  │ (trait)    │ CommandRunner  │ (trait)  │
//! │      └──────┬───────┘            └───────┬────────┘          │
//! └─────────────┼────────────────────────────┼───────────────────┘
//!        ┌──────┴──────┐              ┌──────┴───────┐
//!     RealFs        MockFs        RealRunner     MockRunner
//! ```
//!
//! # Usage
//!
//! ```
//! use hwinfo_core::collector::{Collector, CollectorConfig, MockFs, MockRunner};
//! use hwinfo_core::model::Section;
//!
//! let mut collector = Collector::new(
//!     MockFs::typical_workstation(),
//!     MockRunner::typical_workstation(),
//!     CollectorConfig::default(),
//! );
//! let inventory = collector.collect_inventory(&Section::ALL);
//! assert_eq!(inventory.cpus.unwrap().len(), 2);
//! ```

#[allow(clippy::module_inception)]
mod collector;
mod cpu;
mod drive;
mod error;
mod memory;
pub mod mock;
mod network;
pub mod parser;
mod system;
pub mod traits;

pub use collector::{Collector, CollectorConfig, CollectorTiming};
pub use cpu::parse_cpuinfo;
pub use drive::{SmartIdentity, parse_lsscsi, parse_rotational, parse_smartctl_info};
pub use error::CollectError;
pub use memory::parse_memory;
pub use mock::{MockFs, MockRunner};
pub use network::{count_scan_cells, has_hard_block, parse_nmcli_devices};
pub use system::parse_system_info;
pub use traits::{CommandOutput, CommandRunner, FileSystem, RealFs, RealRunner};
