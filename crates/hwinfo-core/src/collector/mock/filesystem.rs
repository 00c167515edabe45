//! In-memory mock filesystem for testing collectors without real `/proc` and `/sys`.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files and directories in memory, allowing tests to simulate
/// `/proc/cpuinfo` and `/sys` attributes without Linux.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Every ancestor directory of a stored file.
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();

        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }

        self.files.insert(path, content.into());
    }

    /// Adds the sysfs attributes of one block device.
    ///
    /// `rotational` is the raw content of `queue/rotational` (`"0\n"`, `"1\n"`).
    pub fn add_block_device(&mut self, sys_path: impl AsRef<Path>, name: &str, rotational: &str) {
        let base = sys_path.as_ref().join("block").join(name);
        self.add_file(base.join("queue/rotational"), rotational);
    }

    /// Adds `cpufreq/cpuinfo_max_freq` (in kHz) for one logical CPU.
    pub fn add_cpu_max_freq(&mut self, sys_path: impl AsRef<Path>, cpu: u32, khz: u64) {
        let path = sys_path
            .as_ref()
            .join(format!("devices/system/cpu/cpu{cpu}/cpufreq/cpuinfo_max_freq"));
        self.add_file(path, format!("{khz}\n"));
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/cpuinfo", "processor\t: 0\n");

        assert!(fs.exists(Path::new("/proc/cpuinfo")));
        assert!(fs.exists(Path::new("/proc")));

        let content = fs.read_to_string(Path::new("/proc/cpuinfo")).unwrap();
        assert_eq!(content, "processor\t: 0\n");
    }

    #[test]
    fn test_mock_fs_sysfs_helpers() {
        let mut fs = MockFs::new();
        fs.add_block_device("/sys", "sda", "1\n");
        fs.add_cpu_max_freq("/sys", 2, 4_200_000);

        assert!(fs.exists(Path::new("/sys/block/sda")));
        assert_eq!(
            fs.read_to_string(Path::new("/sys/block/sda/queue/rotational")).unwrap(),
            "1\n"
        );
        assert_eq!(
            fs.read_to_string(Path::new("/sys/devices/system/cpu/cpu2/cpufreq/cpuinfo_max_freq"))
                .unwrap(),
            "4200000\n"
        );
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
