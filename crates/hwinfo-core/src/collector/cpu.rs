//! Physical CPUs from `/proc/cpuinfo`.
//!
//! `/proc/cpuinfo` lists every logical core. Logical cores of one package
//! share a `physical id`, so the blocks are merged on that field and the
//! first logical core of each package describes the whole package.

use std::str::FromStr;

use crate::collector::collector::Collector;
use crate::collector::error::CollectError;
use crate::collector::parser::{Marker, RecordBlock, split_records};
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::CpuInfo;

fn parse_number<T: FromStr>(block: &RecordBlock, key: &str) -> Result<Option<T>, CollectError> {
    match block.get(key) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| CollectError::parse(format!("invalid {key} in cpuinfo: {value:?}"))),
    }
}

/// Parses `/proc/cpuinfo` into one record per physical package.
///
/// `max_freq_khz` returns the content of `cpufreq/cpuinfo_max_freq` for a
/// logical CPU number, or `Ok(None)` when cpufreq is not available. In that case
/// the `cpu MHz` line is used, on the assumption that a firmware that blocks
/// frequency scaling runs the CPU at full speed.
pub fn parse_cpuinfo<M>(content: &str, max_freq_khz: M) -> Result<Vec<CpuInfo>, CollectError>
where
    M: Fn(u32) -> Result<Option<String>, CollectError>,
{
    let blocks = split_records(content.lines(), Marker::Field("processor"), Some("physical id"));

    let mut cpus = Vec::with_capacity(blocks.len());
    for (id, block) in blocks.iter().enumerate() {
        let processor: u32 = parse_number(block, "processor")?.unwrap_or_default();

        let freq_ghz = match max_freq_khz(processor)? {
            Some(raw) => {
                let khz: u64 = raw.trim().parse().map_err(|_| {
                    CollectError::parse(format!("invalid cpuinfo_max_freq for cpu{processor}: {raw:?}"))
                })?;
                khz as f64 / 1_000_000.0
            }
            None => parse_number::<f64>(block, "cpu MHz")?.unwrap_or_default() / 1000.0,
        };

        cpus.push(CpuInfo {
            id: id as u32,
            model: block.get("model name").unwrap_or_default().to_string(),
            freq_ghz,
            physical_id: parse_number(block, "physical id")?.unwrap_or_default(),
            physical_cores: parse_number(block, "cpu cores")?.unwrap_or_default(),
            logical_cores: parse_number(block, "siblings")?.unwrap_or_default(),
        });
    }
    Ok(cpus)
}

impl<F: FileSystem, R: CommandRunner> Collector<F, R> {
    /// Reads `/proc/cpuinfo` and the cpufreq limits under sysfs.
    pub fn collect_cpus(&self) -> Result<Vec<CpuInfo>, CollectError> {
        let content = self.read_file(&self.config.proc_path.join("cpuinfo"))?;
        parse_cpuinfo(&content, |processor| {
            let path = self
                .config
                .sys_path
                .join(format!("devices/system/cpu/cpu{processor}/cpufreq/cpuinfo_max_freq"));
            if !self.fs.exists(&path) {
                return Ok(None);
            }
            self.read_file(&path).map(Some)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectorConfig;
    use crate::collector::mock::{MockFs, MockRunner};

    fn logical_core(processor: u32, physical_id: u32, mhz: &str) -> String {
        format!(
            "processor\t: {processor}
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2620 v3 @ 2.40GHz
cpu MHz\t\t: {mhz}
physical id\t: {physical_id}
siblings\t: 4
core id\t\t: {core}
cpu cores\t: 2
flags\t\t: fpu vme de pse

",
            core = processor % 2,
        )
    }

    fn two_sockets() -> String {
        (0..8).map(|n| logical_core(n, n / 4, "1200.000")).collect()
    }

    #[test]
    fn test_parse_cpuinfo_merges_logical_cores() {
        let cpus = parse_cpuinfo(&two_sockets(), |_| Ok(None)).unwrap();
        assert_eq!(cpus.len(), 2);

        assert_eq!(cpus[0].id, 0);
        assert_eq!(cpus[0].physical_id, 0);
        assert_eq!(cpus[0].model, "Intel Xeon CPU E5-2620 v3 @ 2.40GHz");
        assert_eq!(cpus[0].physical_cores, 2);
        assert_eq!(cpus[0].logical_cores, 4);
        assert!((cpus[0].freq_ghz - 1.2).abs() < 1e-9);

        assert_eq!(cpus[1].id, 1);
        assert_eq!(cpus[1].physical_id, 1);
    }

    #[test]
    fn test_parse_cpuinfo_prefers_cpufreq() {
        let cpus = parse_cpuinfo(&two_sockets(), |processor| match processor {
            0 => Ok(Some("3200000\n".to_string())),
            4 => Ok(Some("2600000\n".to_string())),
            _ => panic!("only the first core of each package is queried"),
        })
        .unwrap();
        assert!((cpus[0].freq_ghz - 3.2).abs() < 1e-9);
        assert!((cpus[1].freq_ghz - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_parse_cpuinfo_invalid_numbers() {
        let err = parse_cpuinfo(&logical_core(0, 0, "fast"), |_| Ok(None)).unwrap_err();
        assert!(err.to_string().contains("cpu MHz"));

        let err = parse_cpuinfo(&logical_core(0, 0, "800.0"), |_| Ok(Some("abc".into()))).unwrap_err();
        assert!(err.to_string().contains("cpuinfo_max_freq"));
    }

    #[test]
    fn test_parse_cpuinfo_without_physical_id() {
        // Some architectures omit `physical id`: every core counts as one package.
        let content = "processor\t: 0\nBogoMIPS\t: 48.00\n\nprocessor\t: 1\nBogoMIPS\t: 48.00\n";
        let cpus = parse_cpuinfo(content, |_| Ok(None)).unwrap();
        assert_eq!(cpus.len(), 1);
        assert_eq!(cpus[0].physical_id, 0);
        assert_eq!(cpus[0].freq_ghz, 0.0);
    }

    #[test]
    fn test_collect_cpus_reads_sysfs() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", two_sockets());
        fs.add_cpu_max_freq("/sys", 0, 3_000_000);
        let collector = Collector::new(fs, MockRunner::new(), CollectorConfig::default());

        let cpus = collector.collect_cpus().unwrap();
        assert!((cpus[0].freq_ghz - 3.0).abs() < 1e-9);
        assert!((cpus[1].freq_ghz - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_collect_cpus_unreadable_cpufreq_fails() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", two_sockets());
        // cpuinfo_max_freq exists but is a directory.
        fs.add_file("/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq/stray", "");
        let collector = Collector::new(fs, MockRunner::new(), CollectorConfig::default());

        let err = collector.collect_cpus().unwrap_err();
        assert!(matches!(err, CollectError::Io { ref path, .. } if path.ends_with("cpuinfo_max_freq")));
    }
}
