//! Pre-built mock scenarios for testing.
//!
//! The typical workstation is a dual-socket desktop with four DIMM slots
//! (two populated), a SATA hard disk, an NVMe SSD, a USB stick that must be
//! ignored, and wired plus wireless networking.

use super::filesystem::MockFs;
use super::runner::MockRunner;
use crate::collector::traits::CommandOutput;

const CPUINFO_CORE: &str = "\
processor\t: {n}
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 85
model name\t: Intel(R) Xeon(R) Silver 4110 CPU @ 2.10GHz
stepping\t: 4
cpu MHz\t\t: 800.012
cache size\t: 11264 KB
physical id\t: {socket}
siblings\t: 4
core id\t\t: {core}
cpu cores\t: 2
flags\t\t: fpu vme de pse tsc msr pae mce cx8 apic sep mtrr

";

const DMI_SYSTEM: &str = "\
# dmidecode 3.3
Getting SMBIOS data from sysfs.
SMBIOS 3.1.1 present.

Handle 0x0001, DMI type 1, 27 bytes
System Information
\tManufacturer: LENOVO
\tProduct Name: 30BA00EUUS
\tVersion: ThinkStation P720
\tSerial Number: S4AB1234
\tUUID: 1c2d3e4f-0000-0000-0000-000000000000
\tWake-up Type: Power Switch
\tFamily: ThinkStation P720
";

const DMI_MEMORY: &str = "\
# dmidecode 3.3
Getting SMBIOS data from sysfs.
SMBIOS 3.1.1 present.

Handle 0x0030, DMI type 16, 23 bytes
Physical Memory Array
\tLocation: System Board Or Motherboard
\tUse: System Memory
\tError Correction Type: Multi-bit ECC
\tMaximum Capacity: 384 GB
\tNumber Of Devices: 4

Handle 0x0031, DMI type 17, 40 bytes
Memory Device
\tArray Handle: 0x0030
\tSize: 16384 MB
\tForm Factor: DIMM
\tLocator: DIMM1
\tBank Locator: NODE 1
\tType: DDR4
\tType Detail: Synchronous Registered (Buffered)
\tSpeed: 2666 MT/s
\tManufacturer: Micron

Handle 0x0032, DMI type 17, 40 bytes
Memory Device
\tArray Handle: 0x0030
\tSize: No Module Installed
\tForm Factor: DIMM
\tLocator: DIMM2
\tBank Locator: NODE 1
\tType: Unknown
\tSpeed: Unknown

Handle 0x0033, DMI type 17, 40 bytes
Memory Device
\tArray Handle: 0x0030
\tSize: 16 GB (Registered)
\tForm Factor: DIMM
\tLocator: DIMM3
\tBank Locator: NODE 2
\tType: DDR4
\tSpeed: 2666 MT/s

Handle 0x0034, DMI type 17, 40 bytes
Memory Device
\tArray Handle: 0x0030
\tSize: No Module Installed
\tForm Factor: DIMM
\tLocator: DIMM4
\tBank Locator: NODE 2
\tType: Unknown
\tSpeed: Unknown

Handle 0x0035, DMI type 17, 40 bytes
Memory Device
\tSize: 16 MB
\tForm Factor: Chip
\tLocator: SYSTEM ROM
\tType: Flash
";

const LSSCSI: &str = "\
[0:0:0:0]    disk    sata:5000c500a1b2c3d4                   /dev/sda
[3:0:0:0]    cd/dvd  sata:                                   /dev/sr0
[6:0:0:0]    disk    usb: 2-1:1.0                            /dev/sdb
[N:0:1:1]    disk    pcie 0x144d:0xa801                      /dev/nvme0n1
";

const SMART_SDA: &str = "\
smartctl 7.2 2020-12-30 r5155 [x86_64-linux-5.15.0] (local build)

=== START OF INFORMATION SECTION ===
Model Family:     Seagate Barracuda 7200.14 (AF)
Device Model:     ST2000DM001-1ER164
Serial Number:    Z4Z0ABCD
User Capacity:    2,000,398,934,016 bytes [2.00 TB]
Sector Sizes:     512 bytes logical, 4096 bytes physical
Rotation Rate:    7200 rpm
SMART support is: Available - device has SMART capability.
SMART support is: Enabled
";

const SMART_NVME: &str = "\
smartctl 7.2 2020-12-30 r5155 [x86_64-linux-5.15.0] (local build)

=== START OF INFORMATION SECTION ===
Model Number:                       Samsung SSD 970 EVO Plus 1TB
Serial Number:                      S4EWNX0N654321
Total NVM Capacity:                 1,000,204,886,016 [1.00 TB]
";

const NMCLI: &str = "\
enp0s31f6:ethernet:connected
wlp4s0:wifi:disconnected
lo:loopback:unmanaged
";

impl MockFs {
    /// Kernel files of the typical workstation under `/proc` and `/sys`.
    pub fn typical_workstation() -> Self {
        let mut fs = Self::new();

        let cpuinfo: String = (0..8u32)
            .map(|n| {
                CPUINFO_CORE
                    .replace("{n}", &n.to_string())
                    .replace("{socket}", &(n / 4).to_string())
                    .replace("{core}", &(n % 2).to_string())
            })
            .collect();
        fs.add_file("/proc/cpuinfo", cpuinfo);
        fs.add_cpu_max_freq("/sys", 0, 3_000_000);
        fs.add_cpu_max_freq("/sys", 4, 3_000_000);

        fs.add_block_device("/sys", "sda", "1\n");
        fs.add_block_device("/sys", "nvme0n1", "0\n");
        fs.add_block_device("/sys", "sdb", "1\n");

        fs
    }
}

impl MockRunner {
    /// Tool output of the typical workstation.
    pub fn typical_workstation() -> Self {
        let mut runner = Self::new();

        runner.add_output("dmidecode -t 1", DMI_SYSTEM);
        runner.add("laptop-detect", CommandOutput::with_code("", 1));
        runner.add_output("dmidecode -t 16,17", DMI_MEMORY);

        runner.add_output("lsscsi -t", LSSCSI);
        runner.add_output("smartctl -i /dev/sda", SMART_SDA);
        runner.add_output(
            "smartctl -H /dev/sda",
            "SMART overall-health self-assessment test result: PASSED\n",
        );
        runner.add_output("lsblk -lnr /dev/sda", "sda 8:0 0 1.8T 0 disk \nsda1 8:1 0 1.8T 0 part /data\n");
        // NVMe drives report health through their own log; -i has no SMART line.
        runner.add_output("smartctl -i /dev/nvme0n1", SMART_NVME);
        runner.add_output("lsblk -lnr /dev/nvme0n1", "nvme0n1 259:0 0 931.5G 0 disk \n");

        runner.add_output("nmcli -t -f DEVICE,TYPE,STATE dev", NMCLI);
        runner.add_output(
            "iwlist wlp4s0 scan",
            "wlp4s0    Scan completed :\n          Cell 01 - Address: 00:11:22:33:44:55\n                    ESSID:\"office\"\n",
        );
        runner.add_output(
            "rfkill list wifi",
            "0: phy0: Wireless LAN\n\tSoft blocked: no\n\tHard blocked: no\n",
        );

        runner
    }
}
