//! Typed hardware records assembled by the collectors.
//!
//! Everything here is plain data: no I/O, no parsing. All records serialize
//! with `serde`, sizes as integer byte counts.

use std::fmt;

use serde::Serialize;

use crate::size::ByteSize;

/// Identity of the machine itself (`dmidecode -t 1`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub vendor: String,
    pub model: String,
    pub version: String,
    pub serial: String,
    pub is_laptop: bool,
}

impl SystemInfo {
    /// Model with the version appended, when the firmware reports one.
    pub fn model_version(&self) -> String {
        if self.version.is_empty() || self.version == "Not Specified" {
            self.model.clone()
        } else {
            format!("{} - {}", self.model, self.version)
        }
    }
}

/// One physical CPU package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CpuInfo {
    /// Position among the installed packages, starting at 0.
    pub id: u32,
    pub model: String,
    pub freq_ghz: f64,
    pub physical_id: u32,
    pub physical_cores: u32,
    pub logical_cores: u32,
}

/// Installed memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RamInfo {
    /// Capacity supported by the board, summed over all memory arrays.
    pub max_size: ByteSize,
    pub modules: Vec<RamModule>,
}

impl RamInfo {
    /// Total size of all populated modules, saturating at `u64::MAX` bytes.
    pub fn installed_size(&self) -> ByteSize {
        self.modules.iter().map(|m| m.size).sum()
    }
}

/// One memory slot. Empty slots have a zero size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RamModule {
    pub size: ByteSize,
    pub slot: String,
    /// DDR, DDR2, DDR3...
    pub class: String,
    /// DIMM, SODIMM...
    pub form_factor: String,
    pub freq_mhz: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriveKind {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
}

impl fmt::Display for DriveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveKind::Ssd => f.write_str("SSD"),
            DriveKind::Hdd => f.write_str("HDD"),
        }
    }
}

/// A local, non-USB disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveInfo {
    /// Device node, e.g. `/dev/sda`.
    pub device: String,
    pub model: String,
    pub serial: String,
    pub size: ByteSize,
    pub smart_enabled: bool,
    /// Only meaningful when `smart_enabled` is set.
    pub smart_passed: bool,
    pub kind: DriveKind,
    pub no_partitions: bool,
}

/// A network interface as reported by NetworkManager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    pub device: String,
    /// NetworkManager type, e.g. `ethernet`, `wifi`, `loopback`.
    pub kind: String,
    /// connected, disconnected, unavailable, unmanaged...
    pub state: String,
}

impl InterfaceInfo {
    pub fn is_wireless(&self) -> bool {
        self.kind.contains("wifi") || self.kind.contains("wireless")
    }

    pub fn is_ethernet(&self) -> bool {
        self.kind.contains("ethernet")
    }
}

/// An inventory family, collected independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    System,
    Cpu,
    Ram,
    Drives,
    Network,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::System,
        Section::Cpu,
        Section::Ram,
        Section::Drives,
        Section::Network,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::System => "system",
            Section::Cpu => "cpu",
            Section::Ram => "ram",
            Section::Drives => "drives",
            Section::Network => "network",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why one section is missing from an [`Inventory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionError {
    pub section: Section,
    pub message: String,
}

/// Everything collected in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inventory {
    /// Unix timestamp (seconds) when collection started.
    pub collected_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus: Option<Vec<CpuInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<RamInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drives: Option<Vec<DriveInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<InterfaceInfo>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SectionError>,
}

impl Inventory {
    /// True when at least one section was collected.
    pub fn has_data(&self) -> bool {
        self.system.is_some()
            || self.cpus.is_some()
            || self.ram.is_some()
            || self.drives.is_some()
            || self.interfaces.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_version() {
        let mut system = SystemInfo {
            model: "20KH006JUS".into(),
            version: "ThinkPad X1 Carbon 6th".into(),
            ..Default::default()
        };
        assert_eq!(system.model_version(), "20KH006JUS - ThinkPad X1 Carbon 6th");

        system.version = "Not Specified".into();
        assert_eq!(system.model_version(), "20KH006JUS");

        system.version.clear();
        assert_eq!(system.model_version(), "20KH006JUS");
    }

    #[test]
    fn test_installed_size_sums_modules() {
        let module = |gb: u64| RamModule {
            size: ByteSize::new(gb << 30),
            ..Default::default()
        };
        let ram = RamInfo {
            max_size: ByteSize::new(64 << 30),
            modules: vec![module(8), module(0), module(16)],
        };
        assert_eq!(ram.installed_size().to_string(), "24 GB");

        let huge = RamModule {
            size: ByteSize::new(u64::MAX),
            ..Default::default()
        };
        let ram = RamInfo {
            max_size: ByteSize::ZERO,
            modules: vec![huge.clone(), huge],
        };
        assert_eq!(ram.installed_size().bytes(), u64::MAX);
    }

    #[test]
    fn test_interface_kind_checks() {
        let iface = |kind: &str| InterfaceInfo {
            device: "x".into(),
            kind: kind.into(),
            state: "connected".into(),
        };
        assert!(iface("wifi").is_wireless());
        assert!(iface("802-11-wireless").is_wireless());
        assert!(!iface("ethernet").is_wireless());
        assert!(iface("ethernet").is_ethernet());
        assert!(!iface("loopback").is_ethernet());
    }

    #[test]
    fn test_inventory_serializes_sizes_as_bytes() {
        let inventory = Inventory {
            collected_at: 1_700_000_000,
            ram: Some(RamInfo {
                max_size: ByteSize::new(1 << 30),
                modules: vec![],
            }),
            errors: vec![SectionError {
                section: Section::Drives,
                message: "lsscsi: not found".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&inventory).unwrap();
        assert_eq!(json["ram"]["max_size"], 1_073_741_824u64);
        assert_eq!(json["errors"][0]["section"], "drives");
        assert!(json.get("system").is_none());
    }
}
