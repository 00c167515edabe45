//! System identity from `dmidecode -t 1` and `laptop-detect`.

use crate::collector::collector::{Collector, command_error};
use crate::collector::error::CollectError;
use crate::collector::parser::parse_fields;
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::SystemInfo;

/// Parses `dmidecode -t 1` output. `is_laptop` is left unset.
pub fn parse_system_info(content: &str) -> SystemInfo {
    let mut system = SystemInfo::default();
    for field in parse_fields(content.lines()) {
        match field.key.as_str() {
            "Manufacturer" => system.vendor = field.value,
            "Product Name" => system.model = field.value,
            "Version" => system.version = field.value,
            "Serial Number" => system.serial = field.value,
            _ => {}
        }
    }
    system
}

impl<F: FileSystem, R: CommandRunner> Collector<F, R> {
    /// Requires `dmidecode` (root) and `laptop-detect`.
    pub fn collect_system(&self) -> Result<SystemInfo, CollectError> {
        let dmi = self.run_checked("dmidecode", &["-t", "1"])?;
        let mut system = parse_system_info(&dmi.stdout);

        // laptop-detect answers through its exit status.
        let detect = self.run("laptop-detect", &[])?;
        system.is_laptop = match detect.code {
            Some(0) => true,
            Some(1) => false,
            _ => return Err(command_error("laptop-detect", &detect)),
        };
        Ok(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectorConfig;
    use crate::collector::mock::{MockFs, MockRunner};
    use crate::collector::traits::CommandOutput;

    const DMI_SYSTEM: &str = "\
# dmidecode 3.3
Getting SMBIOS data from sysfs.
SMBIOS 3.0.0 present.

Handle 0x000F, DMI type 1, 27 bytes
System Information
\tManufacturer: LENOVO
\tProduct Name: 20KH006JUS
\tVersion: ThinkPad X1 Carbon 6th
\tSerial Number: PF1ABCDE
\tUUID: 7a9b1c2d-0000-0000-0000-000000000000
\tWake-up Type: Power Switch
\tSKU Number: LENOVO_MT_20KH_BU_Think_FM_ThinkPad X1 Carbon 6th
\tFamily: ThinkPad X1 Carbon 6th
";

    #[test]
    fn test_parse_system_info() {
        let system = parse_system_info(DMI_SYSTEM);
        assert_eq!(system.vendor, "LENOVO");
        assert_eq!(system.model, "20KH006JUS");
        assert_eq!(system.version, "ThinkPad X1 Carbon 6th");
        assert_eq!(system.serial, "PF1ABCDE");
        assert!(!system.is_laptop);
    }

    fn collector_with_detect(code: i32) -> Collector<MockFs, MockRunner> {
        let mut runner = MockRunner::new();
        runner.add_output("dmidecode -t 1", DMI_SYSTEM);
        runner.add("laptop-detect", CommandOutput::with_code("", code));
        Collector::new(MockFs::new(), runner, CollectorConfig::default())
    }

    #[test]
    fn test_collect_system_laptop_exit_codes() {
        assert!(collector_with_detect(0).collect_system().unwrap().is_laptop);
        assert!(!collector_with_detect(1).collect_system().unwrap().is_laptop);

        let err = collector_with_detect(2).collect_system().unwrap_err();
        assert!(matches!(err, CollectError::Command { code: 2, .. }));
    }

    #[test]
    fn test_collect_system_dmidecode_failure() {
        let mut runner = MockRunner::new();
        runner.add("dmidecode -t 1", CommandOutput::with_code("", 1));
        let collector = Collector::new(MockFs::new(), runner, CollectorConfig::default());
        let err = collector.collect_system().unwrap_err();
        assert!(matches!(err, CollectError::Command { ref program, .. } if program == "dmidecode"));
        assert_eq!(collector.runner().calls(), ["dmidecode -t 1"]);
    }
}
