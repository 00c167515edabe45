//! Local disks from `lsscsi`, `smartctl`, sysfs and `lsblk`.

use std::path::Path;

use tracing::{debug, warn};

use crate::collector::collector::{Collector, command_error};
use crate::collector::error::CollectError;
use crate::collector::parser::{KEY_VALUE_SEPARATOR, normalize_line};
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::{DriveInfo, DriveKind};
use crate::size::ByteSize;

/// smartctl exit status bits.
const SMART_CMDLINE_ERROR: i32 = 0x01;
const SMART_OPEN_FAILED: i32 = 0x02;
const SMART_DISK_FAILING: i32 = 0x08;

/// Device nodes of non-USB disks listed by `lsscsi -t`.
///
/// ```text
/// [0:0:0:0]    disk    sata:5000c500a1b2c3d4           /dev/sda
/// [6:0:0:0]    disk    usb: 1-1:1.0                    /dev/sdb
/// ```
pub fn parse_lsscsi(content: &str) -> Vec<String> {
    let mut devices = Vec::new();
    for line in content.lines() {
        if !line.contains("disk") || line.contains("usb:") {
            continue;
        }
        match line.find("/dev") {
            Some(i) => devices.push(line[i..].trim().to_string()),
            None => warn!(line, "disk without a device node"),
        }
    }
    devices
}

/// Identity fields from `smartctl -i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmartIdentity {
    pub model: String,
    pub serial: String,
    pub size: ByteSize,
    /// `None` when smartctl does not say.
    pub smart_enabled: Option<bool>,
}

/// Parses a capacity value such as `500,107,862,016 bytes [500 GB]`.
///
/// The exact byte count wins; the bracketed size is the fallback.
fn parse_capacity(value: &str) -> Result<ByteSize, CollectError> {
    let (exact, bracket) = match value.split_once('[') {
        Some((exact, rest)) => (exact, rest.split_once(']').map(|(b, _)| b)),
        None => (value, None),
    };

    let digits: String = exact
        .trim()
        .trim_end_matches("bytes")
        .chars()
        .filter(|c| *c != ',' && *c != '.' && !c.is_whitespace())
        .collect();
    if let Ok(bytes) = digits.parse::<u64>() {
        return Ok(ByteSize::new(bytes));
    }

    match bracket {
        Some(human) => Ok(human.parse()?),
        None => Err(CollectError::parse(format!("invalid drive capacity: {value:?}"))),
    }
}

/// Parses `smartctl -i` output for ATA, NVMe and SCSI devices.
pub fn parse_smartctl_info(content: &str) -> Result<SmartIdentity, CollectError> {
    let mut ident = SmartIdentity::default();
    for line in content.lines() {
        let field = normalize_line(line, KEY_VALUE_SEPARATOR);
        match field.key.as_str() {
            "Device Model" | "Model Number" | "Product" => ident.model = field.value,
            "Serial Number" => ident.serial = field.value,
            "User Capacity" | "Total NVM Capacity" => ident.size = parse_capacity(&field.value)?,
            "SMART support is" => {
                if field.value == "Enabled" {
                    ident.smart_enabled = Some(true);
                } else if field.value.contains("Unavailable") || field.value == "Disabled" {
                    ident.smart_enabled = Some(false);
                }
            }
            _ => {}
        }
    }
    Ok(ident)
}

/// Maps `queue/rotational` content to a drive kind.
pub fn parse_rotational(content: &str) -> Result<DriveKind, CollectError> {
    match content.trim() {
        "0" => Ok(DriveKind::Ssd),
        "1" => Ok(DriveKind::Hdd),
        other => Err(CollectError::parse(format!("invalid rotational value: {other:?}"))),
    }
}

impl<F: FileSystem, R: CommandRunner> Collector<F, R> {
    /// Requires `lsscsi`, `smartctl` (root) and `lsblk`.
    pub fn collect_drives(&self) -> Result<Vec<DriveInfo>, CollectError> {
        let listing = self.run_checked("lsscsi", &["-t"])?;
        parse_lsscsi(&listing.stdout)
            .into_iter()
            .map(|device| self.collect_drive(&device))
            .collect()
    }

    fn collect_drive(&self, device: &str) -> Result<DriveInfo, CollectError> {
        let info = self.run("smartctl", &["-i", device])?;
        if info.code.is_none_or(|c| c & (SMART_CMDLINE_ERROR | SMART_OPEN_FAILED) != 0) {
            return Err(command_error("smartctl", &info));
        }
        let ident = parse_smartctl_info(&info.stdout)?;

        let smart_enabled = ident.smart_enabled.unwrap_or(false);
        let smart_passed = smart_enabled && self.smart_health(device)?;

        let name = Path::new(device)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(device);
        let rotational = self
            .config
            .sys_path
            .join("block")
            .join(name)
            .join("queue/rotational");
        let kind = parse_rotational(&self.read_file(&rotational)?)?;

        // The kernel lists the disk itself plus one line per partition.
        let lsblk = self.run_checked("lsblk", &["-lnr", device])?;
        let no_partitions = match lsblk.lines().filter(|l| !l.trim().is_empty()).count() {
            0 => {
                return Err(CollectError::parse(format!("lsblk printed nothing for {device}")));
            }
            n => n == 1,
        };

        debug!(device, %kind, size = %ident.size, "drive collected");
        Ok(DriveInfo {
            device: device.to_string(),
            model: ident.model,
            serial: ident.serial,
            size: ident.size,
            smart_enabled,
            smart_passed,
            kind,
            no_partitions,
        })
    }

    /// Overall SMART health. Only an actually failing disk counts as failed.
    fn smart_health(&self, device: &str) -> Result<bool, CollectError> {
        let health = self.run("smartctl", &["-H", device])?;
        match health.code {
            Some(code) if code & SMART_CMDLINE_ERROR == 0 => Ok(code & SMART_DISK_FAILING == 0),
            _ => Err(command_error("smartctl", &health)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectorConfig;
    use crate::collector::mock::{MockFs, MockRunner};
    use crate::collector::traits::CommandOutput;

    const LSSCSI: &str = "\
[0:0:0:0]    disk    sata:5000c500a1b2c3d4                   /dev/sda
[1:0:0:0]    cd/dvd  sata:                                   /dev/sr0
[6:0:0:0]    disk    usb: 1-1:1.0                            /dev/sdb
[N:0:1:1]    disk    pcie 0x144d:0xa801                      /dev/nvme0n1
";

    const SMART_ATA: &str = "\
smartctl 7.2 2020-12-30 r5155 [x86_64-linux-5.15.0] (local build)

=== START OF INFORMATION SECTION ===
Model Family:     Seagate Barracuda 7200.14 (AF)
Device Model:     ST1000DM003-1CH162
Serial Number:    Z1D5ABCD
User Capacity:    1,000,204,886,016 bytes [1.00 TB]
Sector Sizes:     512 bytes logical, 4096 bytes physical
Rotation Rate:    7200 rpm
SMART support is: Available - device has SMART capability.
SMART support is: Enabled
";

    const SMART_NVME: &str = "\
=== START OF INFORMATION SECTION ===
Model Number:                       Samsung SSD 970 EVO Plus 500GB
Serial Number:                      S4EVNX0N123456
Total NVM Capacity:                 500,107,862,016 [500 GB]
";

    #[test]
    fn test_parse_lsscsi_skips_usb_and_non_disks() {
        assert_eq!(parse_lsscsi(LSSCSI), ["/dev/sda", "/dev/nvme0n1"]);
    }

    #[test]
    fn test_parse_smartctl_info_ata() {
        let ident = parse_smartctl_info(SMART_ATA).unwrap();
        assert_eq!(ident.model, "ST1000DM003-1CH162");
        assert_eq!(ident.serial, "Z1D5ABCD");
        assert_eq!(ident.size.bytes(), 1_000_204_886_016);
        assert_eq!(ident.smart_enabled, Some(true));
    }

    #[test]
    fn test_parse_smartctl_info_nvme() {
        let ident = parse_smartctl_info(SMART_NVME).unwrap();
        assert_eq!(ident.model, "Samsung SSD 970 EVO Plus 500GB");
        assert_eq!(ident.size.bytes(), 500_107_862_016);
        assert_eq!(ident.smart_enabled, None);
    }

    #[test]
    fn test_parse_capacity_falls_back_to_bracket() {
        assert_eq!(parse_capacity("unknown [2 TB]").unwrap().to_string(), "2 TB");
        assert_eq!(parse_capacity("512 bytes").unwrap().bytes(), 512);
        assert!(parse_capacity("unknown").is_err());
        assert!(matches!(parse_capacity("n/a [2 XB]"), Err(CollectError::Size(_))));
    }

    #[test]
    fn test_parse_smartctl_unavailable() {
        let ident = parse_smartctl_info("SMART support is: Unavailable - device lacks SMART capability.\n").unwrap();
        assert_eq!(ident.smart_enabled, Some(false));
    }

    #[test]
    fn test_parse_rotational() {
        assert_eq!(parse_rotational("0\n").unwrap(), DriveKind::Ssd);
        assert_eq!(parse_rotational("1").unwrap(), DriveKind::Hdd);
        assert!(parse_rotational("2").is_err());
    }

    fn drive_collector(health_code: i32, lsblk: &str) -> Collector<MockFs, MockRunner> {
        let mut fs = MockFs::new();
        fs.add_block_device("/sys", "sda", "1\n");
        let mut runner = MockRunner::new();
        runner.add_output("lsscsi -t", "[0:0:0:0]  disk  sata:5000c500a1b2c3d4  /dev/sda\n");
        runner.add_output("smartctl -i /dev/sda", SMART_ATA);
        runner.add("smartctl -H /dev/sda", CommandOutput::with_code("", health_code));
        runner.add_output("lsblk -lnr /dev/sda", lsblk);
        Collector::new(fs, runner, CollectorConfig::default())
    }

    #[test]
    fn test_collect_drives_healthy_hdd() {
        let drives = drive_collector(0, "sda 8:0 0 931.5G 0 disk \n").collect_drives().unwrap();
        assert_eq!(drives.len(), 1);
        let d = &drives[0];
        assert_eq!(d.device, "/dev/sda");
        assert_eq!(d.kind, DriveKind::Hdd);
        assert!(d.smart_enabled);
        assert!(d.smart_passed);
        assert!(d.no_partitions);
    }

    #[test]
    fn test_collect_drives_failing_disk_with_partitions() {
        let lsblk = "sda 8:0 0 931.5G 0 disk \nsda1 8:1 0 512M 0 part /boot/efi\nsda2 8:2 0 931G 0 part /\n";
        // Bit 3 (failing) plus bit 6 (error log entries); neither aborts collection.
        let drives = drive_collector(0x48, lsblk).collect_drives().unwrap();
        assert!(!drives[0].smart_passed);
        assert!(!drives[0].no_partitions);
    }

    #[test]
    fn test_collect_drives_health_cmdline_error() {
        let err = drive_collector(0x01, "sda\n").collect_drives().unwrap_err();
        assert!(matches!(err, CollectError::Command { code: 1, .. }));
    }

    #[test]
    fn test_collect_drives_empty_lsblk() {
        let err = drive_collector(0, "").collect_drives().unwrap_err();
        assert!(err.to_string().contains("lsblk"));
    }
}
