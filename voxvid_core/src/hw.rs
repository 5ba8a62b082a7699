use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// GPU vendor classes that hardware codecs can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Nvidia,
    Intel,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Nvidia => "nvidia",
            Vendor::Intel => "intel",
        }
    }
}

/// Capability query over the host's accelerators.
///
/// The negotiation logic never invokes vendor tools directly; it only asks an
/// implementation of this trait how many devices of a vendor class exist.
/// [`SystemProbe`] is the real implementation, [`FixedProbe`] the injectable
/// fake for tests.
pub trait HardwareProbe: Send + Sync {
    /// Number of usable devices of the given vendor class. 0 means absent.
    fn count(&self, vendor: Vendor) -> u32;
}

/// Fixed device counts, for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedProbe {
    pub nvidia: u32,
    pub intel: u32,
}

impl HardwareProbe for FixedProbe {
    fn count(&self, vendor: Vendor) -> u32 {
        match vendor {
            Vendor::Nvidia => self.nvidia,
            Vendor::Intel => self.intel,
        }
    }
}

// ── System probing ─────────────────────────────────────────────────────────

/// Deadline for each external probe process.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
struct Inventory {
    nvidia: u32,
    intel: u32,
}

/// Real hardware probe backed by vendor tools (`nvidia-smi`, `vainfo`).
///
/// Probe processes are spawned at most once per process lifetime; the counts
/// are cached so per-chunk operations never re-probe. A probe that fails to
/// spawn, exits non-zero, or outlives the deadline counts as "hardware
/// absent", never as an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

static INVENTORY: OnceLock<Inventory> = OnceLock::new();

impl HardwareProbe for SystemProbe {
    fn count(&self, vendor: Vendor) -> u32 {
        let inv = INVENTORY.get_or_init(detect_devices);
        match vendor {
            Vendor::Nvidia => inv.nvidia,
            Vendor::Intel => inv.intel,
        }
    }
}

/// Run a probe command with a deadline, returning its stdout on clean exit.
fn run_probe(program: &str, args: &[&str]) -> Option<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + PROBE_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    return None;
                }
                let mut out = String::new();
                child.stdout.take()?.read_to_string(&mut out).ok()?;
                return Some(out);
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            Err(_) => return None,
        }
    }
}

fn detect_devices() -> Inventory {
    let nvidia = match run_probe("nvidia-smi", &["--list-gpus"]) {
        Some(out) => out.lines().filter(|l| !l.trim().is_empty()).count() as u32,
        None => 0,
    };

    // Intel exposes a single shared device; presence is all that matters.
    let intel = if intel_present() { 1 } else { 0 };

    debug!(nvidia, intel, "probed accelerator inventory");
    Inventory { nvidia, intel }
}

#[cfg(unix)]
fn intel_present() -> bool {
    matches!(run_probe("vainfo", &[]), Some(out) if out.contains("VA-API version"))
}

#[cfg(windows)]
fn intel_present() -> bool {
    matches!(
        run_probe("wmic", &["path", "win32_VideoController", "get", "name"]),
        Some(out) if out.contains("Intel")
    )
}

#[cfg(not(any(unix, windows)))]
fn intel_present() -> bool {
    false
}

// ── Negotiation ────────────────────────────────────────────────────────────

/// Vendor class required by a codec, judged from its name.
pub fn vendor_class(codec: &str) -> Option<Vendor> {
    if codec.contains("nvenc") || codec.contains("cuvid") {
        Some(Vendor::Nvidia)
    } else if codec.contains("qsv") {
        Some(Vendor::Intel)
    } else {
        None
    }
}

/// Decide the actually-usable accelerator index for `codec`.
///
/// Returns −1 for CPU-only. An explicit CPU request (`requested_gpu < 0`)
/// returns −1 without probing any hardware. Codecs with no vendor
/// requirement pass the requested index through unchanged. Runs on both
/// paths: at write time to pick a feasible device, and at read time to
/// re-validate the hardware decoder recorded in a stored container.
pub fn validate(probe: &dyn HardwareProbe, codec: &str, requested_gpu: i32) -> i32 {
    if requested_gpu < 0 {
        return -1;
    }

    match vendor_class(codec) {
        Some(Vendor::Nvidia) => {
            let count = probe.count(Vendor::Nvidia);
            if count == 0 {
                warn!(codec, "no nvidia devices detected, falling back to CPU");
                -1
            } else if requested_gpu as u32 >= count {
                let adjusted = count as i32 - 1;
                warn!(codec, requested_gpu, adjusted, "requested GPU not present, clamping");
                adjusted
            } else {
                requested_gpu
            }
        }
        Some(Vendor::Intel) => {
            // Single shared-device assumption: any intel device means index 0.
            if probe.count(Vendor::Intel) > 0 {
                0
            } else {
                warn!(codec, "no intel device detected, falling back to CPU");
                -1
            }
        }
        None => requested_gpu,
    }
}
