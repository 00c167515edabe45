//! Memory arrays and modules from `dmidecode -t 16,17`.

use tracing::debug;

use crate::collector::collector::Collector;
use crate::collector::error::CollectError;
use crate::collector::parser::{Marker, RecordBlock, parse_fields, split_records};
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::{RamInfo, RamModule};
use crate::size::ByteSize;

/// `Size` values dmidecode prints for empty slots.
const EMPTY_SLOT_SIZES: [&str; 3] = ["No Module Installed", "Not Installed", "Unknown"];

fn parse_module(block: &RecordBlock) -> Result<RamModule, CollectError> {
    let size = match block.get("Size") {
        None => ByteSize::ZERO,
        Some(value) if EMPTY_SLOT_SIZES.contains(&value) => ByteSize::ZERO,
        Some(value) => value.parse()?,
    };

    // Empty slots sometimes still report a speed; ignore it.
    let freq_mhz = if size.is_zero() {
        0
    } else {
        block
            .get("Speed")
            .and_then(|v| v.split_whitespace().next())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };

    Ok(RamModule {
        size,
        slot: block.get("Locator").unwrap_or_default().to_string(),
        class: block.get("Type").unwrap_or_default().to_string(),
        form_factor: block.get("Form Factor").unwrap_or_default().to_string(),
        freq_mhz,
    })
}

/// Parses `dmidecode -t 16,17` output.
///
/// The firmware's own ROM is reported as a memory device on some boards;
/// `SYSTEM ROM` slots and `Flash` modules are dropped.
pub fn parse_memory(content: &str) -> Result<RamInfo, CollectError> {
    let mut max_size = ByteSize::ZERO;
    for field in parse_fields(content.lines()) {
        if field.key == "Maximum Capacity" {
            max_size = max_size
                .checked_add(field.value.parse::<ByteSize>()?)
                .ok_or_else(|| {
                    CollectError::parse(format!("total Maximum Capacity overflows: {}", field.value))
                })?;
        }
    }

    let mut modules = Vec::new();
    for block in split_records(content.lines(), Marker::Sentinel("Memory Device"), None) {
        let module = parse_module(&block)?;
        if module.slot == "SYSTEM ROM" || module.form_factor == "Flash" {
            debug!(slot = %module.slot, "skipping firmware memory device");
            continue;
        }
        modules.push(module);
    }

    Ok(RamInfo { max_size, modules })
}

impl<F: FileSystem, R: CommandRunner> Collector<F, R> {
    /// Requires `dmidecode` (root).
    pub fn collect_ram(&self) -> Result<RamInfo, CollectError> {
        let output = self.run_checked("dmidecode", &["-t", "16,17"])?;
        parse_memory(&output.stdout)
    }
}
