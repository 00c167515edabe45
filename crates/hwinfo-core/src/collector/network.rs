//! Network interfaces from NetworkManager, wireless checks via `iwlist` and `rfkill`.
//!
//! Read-only: nothing here unblocks radios or changes interface state.

use crate::collector::collector::Collector;
use crate::collector::error::CollectError;
use crate::collector::parser::split_terse;
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::InterfaceInfo;

/// Parses `nmcli -t -f DEVICE,TYPE,STATE dev` output.
pub fn parse_nmcli_devices(content: &str) -> Result<Vec<InterfaceInfo>, CollectError> {
    let mut interfaces = Vec::new();
    for line in content.lines().filter(|l| !l.trim().is_empty()) {
        let mut parts = split_terse(line).into_iter();
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(device), Some(kind), Some(state), None) => {
                interfaces.push(InterfaceInfo { device, kind, state });
            }
            _ => {
                return Err(CollectError::parse(format!("unexpected nmcli output: {line:?}")));
            }
        }
    }
    Ok(interfaces)
}

/// Number of access points in `iwlist <dev> scan` output.
pub fn count_scan_cells(content: &str) -> usize {
    content
        .lines()
        .filter(|l| l.trim_start().starts_with("Cell"))
        .count()
}

/// True if `rfkill list` reports any hard-blocked radio.
pub fn has_hard_block(content: &str) -> bool {
    content
        .lines()
        .any(|l| l.trim().eq_ignore_ascii_case("hard blocked: yes"))
}

impl<F: FileSystem, R: CommandRunner> Collector<F, R> {
    /// Requires NetworkManager's `nmcli`.
    pub fn collect_interfaces(&self) -> Result<Vec<InterfaceInfo>, CollectError> {
        let output = self.run_checked("nmcli", &["-t", "-f", "DEVICE,TYPE,STATE", "dev"])?;
        parse_nmcli_devices(&output.stdout)
    }

    /// Re-reads the state of `iface` from NetworkManager.
    ///
    /// The state is left unchanged if the device is no longer listed.
    pub fn refresh_interface(&self, iface: &mut InterfaceInfo) -> Result<(), CollectError> {
        if let Some(current) = self
            .collect_interfaces()?
            .into_iter()
            .find(|i| i.device == iface.device)
        {
            iface.state = current.state;
        }
        Ok(())
    }

    /// True if a wireless interface sees at least one access point.
    /// Always false for wired interfaces.
    pub fn can_scan(&self, iface: &InterfaceInfo) -> Result<bool, CollectError> {
        if !iface.is_wireless() {
            return Ok(false);
        }
        let output = self.run_checked("iwlist", &[iface.device.as_str(), "scan"])?;
        Ok(count_scan_cells(&output.stdout) > 0)
    }

    /// True if Wi-Fi is switched off by a hardware switch.
    ///
    /// A radio that is only soft-blocked reports false.
    // TODO: rfkill does not name the interface; map it through `iw dev` to check the right radio.
    pub fn is_hard_blocked(&self) -> Result<bool, CollectError> {
        let output = self.run_checked("rfkill", &["list", "wifi"])?;
        Ok(has_hard_block(&output.stdout))
    }
}
