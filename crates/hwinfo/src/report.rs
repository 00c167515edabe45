//! Plain-text and JSON rendering of a collected inventory.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use hwinfo_core::model::Inventory;
use hwinfo_core::size::{ByteSize, Unit};

/// Wireless checks for one interface. `None` means the check itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiStatus {
    pub device: String,
    pub can_scan: Option<bool>,
    pub hard_blocked: Option<bool>,
}

/// What the binary prints: the inventory plus optional wireless checks.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub inventory: &'a Inventory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub wifi: Vec<WifiStatus>,
}

/// Largest unit not above the size, for approximate display.
fn human(size: ByteSize) -> String {
    match Unit::ALL[1..].iter().rev().find(|u| u.bytes() <= size.bytes()) {
        Some(&unit) => size.format_at(unit),
        None => size.to_string(),
    }
}

fn ram_size(size: ByteSize, unit: Option<Unit>) -> String {
    match unit {
        Some(unit) => size.format_at(unit),
        None => size.to_string(),
    }
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

/// Renders the report as aligned text, one block per collected section.
///
/// Sections that failed are omitted; their errors go to stderr separately.
pub fn render_text(report: &Report<'_>, ram_unit: Option<Unit>) -> String {
    TextReport { report, ram_unit }.to_string()
}

struct TextReport<'a> {
    report: &'a Report<'a>,
    ram_unit: Option<Unit>,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inv = self.report.inventory;

        let collected = Local
            .timestamp_opt(inv.collected_at, 0)
            .single()
            .map(|dt: DateTime<Local>| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "----".to_string());
        writeln!(f, "Collected: {collected}")?;

        if let Some(system) = &inv.system {
            writeln!(f, "\nSystem")?;
            writeln!(f, "  Vendor:  {}", system.vendor)?;
            writeln!(f, "  Model:   {}", system.model_version())?;
            writeln!(f, "  Serial:  {}", system.serial)?;
            writeln!(f, "  Laptop:  {}", yes_no(Some(system.is_laptop)))?;
        }

        if let Some(cpus) = &inv.cpus {
            writeln!(f, "\nCPU")?;
            for cpu in cpus {
                writeln!(
                    f,
                    "  #{} {} @ {:.2} GHz, {} cores / {} threads",
                    cpu.id, cpu.model, cpu.freq_ghz, cpu.physical_cores, cpu.logical_cores
                )?;
            }
        }

        if let Some(ram) = &inv.ram {
            writeln!(f, "\nMemory")?;
            writeln!(f, "  Maximum:   {}", ram_size(ram.max_size, self.ram_unit))?;
            writeln!(f, "  Installed: {}", ram_size(ram.installed_size(), self.ram_unit))?;
            for module in &ram.modules {
                if module.size.is_zero() {
                    writeln!(f, "  {:<16} empty", module.slot)?;
                } else {
                    writeln!(
                        f,
                        "  {:<16} {} {} {} {} MHz",
                        module.slot,
                        ram_size(module.size, self.ram_unit),
                        module.class,
                        module.form_factor,
                        module.freq_mhz
                    )?;
                }
            }
        }

        if let Some(drives) = &inv.drives {
            writeln!(f, "\nDrives")?;
            for d in drives {
                let smart = match (d.smart_enabled, d.smart_passed) {
                    (false, _) => "SMART off",
                    (true, true) => "SMART passed",
                    (true, false) => "SMART FAILED",
                };
                let partitions = if d.no_partitions { ", unpartitioned" } else { "" };
                writeln!(
                    f,
                    "  {:<14} {} {} {} (serial {}), {}{}",
                    d.device,
                    d.kind,
                    human(d.size),
                    d.model,
                    d.serial,
                    smart,
                    partitions
                )?;
            }
        }

        if let Some(interfaces) = &inv.interfaces {
            writeln!(f, "\nNetwork")?;
            for iface in interfaces {
                writeln!(f, "  {:<14} {:<10} {}", iface.device, iface.kind, iface.state)?;
            }
        }

        if !self.report.wifi.is_empty() {
            writeln!(f, "\nWireless")?;
            for w in &self.report.wifi {
                writeln!(
                    f,
                    "  {:<14} access points: {}, hard blocked: {}",
                    w.device,
                    yes_no(w.can_scan),
                    yes_no(w.hard_blocked)
                )?;
            }
        }

        Ok(())
    }
}
