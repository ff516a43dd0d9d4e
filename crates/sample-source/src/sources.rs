//! Sample source implementations.
//!
//! Each source provides a different way to obtain acceleration samples.

use stridesense_common::clock::SessionClock;
use stridesense_common::error::{StrideError, StrideResult};
use stridesense_motion_model::AccelSample;

use crate::SampleSource;

/// Live accelerometer via the Linux industrial-I/O sysfs interface.
///
/// Reads `in_accel_{x,y,z}_raw` and the shared scale from the first IIO
/// device that exposes acceleration channels. Raw readings include
/// gravity; a slow per-axis EMA estimates and removes it so magnitudes
/// sit near zero at rest, matching what the classifier thresholds expect.
#[cfg(target_os = "linux")]
pub struct IioSource {
    device_dir: std::path::PathBuf,
    scale: f64,
    clock: SessionClock,
    gravity: [f64; 3],
    primed: bool,
}

#[cfg(target_os = "linux")]
impl IioSource {
    const SYSFS_ROOT: &'static str = "/sys/bus/iio/devices";

    /// Weight of the newest reading in the gravity estimate.
    const GRAVITY_ALPHA: f64 = 0.05;

    /// Standard gravity, for converting m/s^2 readings to g.
    const STANDARD_GRAVITY: f64 = 9.80665;

    pub fn new() -> StrideResult<Self> {
        let device_dir = Self::find_accel_device().ok_or_else(|| {
            StrideError::sample_source("no IIO accelerometer found under /sys/bus/iio/devices")
        })?;

        let scale = Self::read_value(&device_dir.join("in_accel_scale")).unwrap_or(1.0);

        Ok(Self {
            device_dir,
            scale,
            clock: SessionClock::start(),
            gravity: [0.0; 3],
            primed: false,
        })
    }

    pub fn is_supported() -> bool {
        Self::find_accel_device().is_some()
    }

    fn find_accel_device() -> Option<std::path::PathBuf> {
        let entries = std::fs::read_dir(Self::SYSFS_ROOT).ok()?;
        for entry in entries.flatten() {
            let dir = entry.path();
            if dir.join("in_accel_x_raw").exists() {
                return Some(dir);
            }
        }
        None
    }

    fn read_value(path: &std::path::Path) -> Option<f64> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
    }

    fn read_axes(&self) -> StrideResult<[f64; 3]> {
        let mut axes = [0.0; 3];
        for (i, axis) in ["x", "y", "z"].iter().enumerate() {
            let path = self.device_dir.join(format!("in_accel_{axis}_raw"));
            let text =
                std::fs::read_to_string(&path).map_err(|err| sysfs_read_error(&path, err))?;
            let raw: f64 = text.trim().parse().map_err(|_| {
                StrideError::sample_source(format!("malformed reading in {}", path.display()))
            })?;
            // scale converts raw counts to m/s^2 per the IIO ABI
            axes[i] = raw * self.scale / Self::STANDARD_GRAVITY;
        }
        Ok(axes)
    }
}

/// Channel read failures come in two flavors: missing access rights
/// (fixable with udev rules or group membership) and everything else.
#[cfg(target_os = "linux")]
fn sysfs_read_error(path: &std::path::Path, err: std::io::Error) -> StrideError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        StrideError::PermissionDenied {
            message: format!("cannot read {}", path.display()),
        }
    } else {
        StrideError::sample_source(format!("failed to read {}: {err}", path.display()))
    }
}

#[cfg(target_os = "linux")]
impl SampleSource for IioSource {
    fn poll(&mut self) -> StrideResult<Option<AccelSample>> {
        let raw = self.read_axes()?;

        if !self.primed {
            self.gravity = raw;
            self.primed = true;
        }

        let mut linear = [0.0; 3];
        for i in 0..3 {
            self.gravity[i] =
                self.gravity[i] * (1.0 - Self::GRAVITY_ALPHA) + raw[i] * Self::GRAVITY_ALPHA;
            linear[i] = raw[i] - self.gravity[i];
        }

        Ok(Some(AccelSample::new(
            self.clock.elapsed_ns(),
            linear[0],
            linear[1],
            linear[2],
        )))
    }

    fn name(&self) -> &str {
        "iio"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Simulated motion source for demos and tests.
///
/// Cycles deterministically through stationary, walking, and running
/// phases, pacing itself against wall time so it behaves like a live
/// sensor. Optional periodic spikes exercise the shake detector.
pub struct SimulatedSource {
    clock: SessionClock,
    period_ns: u64,
    next_due_ns: u64,
    phase_ns: u64,
    angle: f64,
    shake_period_ns: Option<u64>,
    last_shake_slot: u64,
}

impl SimulatedSource {
    /// Create a simulator producing samples at `rate_hz`, changing
    /// activity phase every `phase_secs`.
    pub fn new(rate_hz: u32, phase_secs: f64) -> Self {
        Self {
            clock: SessionClock::start(),
            period_ns: 1_000_000_000 / rate_hz.max(1) as u64,
            next_due_ns: 0,
            phase_ns: (phase_secs.max(0.1) * 1_000_000_000.0) as u64,
            angle: 0.0,
            shake_period_ns: None,
            last_shake_slot: 0,
        }
    }

    /// Also emit a shake-level spike roughly every `every_secs`.
    pub fn with_shakes(mut self, every_secs: f64) -> Self {
        self.shake_period_ns = Some((every_secs.max(1.0) * 1_000_000_000.0) as u64);
        self
    }

    /// Generate `duration_secs` worth of samples without wall-clock
    /// pacing. Deterministic: the same arguments always yield the same
    /// stream.
    pub fn generate(rate_hz: u32, phase_secs: f64, duration_secs: f64) -> Vec<AccelSample> {
        let mut sim = Self::new(rate_hz, phase_secs);
        let total = (duration_secs.max(0.0) * rate_hz.max(1) as f64) as u64;

        (0..total)
            .map(|n| {
                let t_ns = n * sim.period_ns;
                sim.angle += 0.5;
                let phase = (t_ns / sim.phase_ns) % 3;
                let (x, y, z) = sim.waveform(phase);
                AccelSample::new(t_ns, x, y, z)
            })
            .collect()
    }

    fn waveform(&self, phase: u64) -> (f64, f64, f64) {
        let a = self.angle;
        match phase {
            // Resting wrist: tiny tremor well under the stationary threshold.
            0 => (a.sin() * 0.02, a.cos() * 0.02, (a * 2.0).sin() * 0.01),
            // Walking: arm swing lands the smoothed magnitude mid-band.
            1 => (a.sin() * 0.18, a.cos() * 0.10, (a * 2.0).sin() * 0.05),
            // Running: large oscillation past the walking threshold.
            _ => (a.sin() * 0.55, a.cos() * 0.40, (a * 2.0).sin() * 0.20),
        }
    }
}

impl SampleSource for SimulatedSource {
    fn poll(&mut self) -> StrideResult<Option<AccelSample>> {
        let now_ns = self.clock.elapsed_ns();
        if now_ns < self.next_due_ns {
            return Ok(None);
        }
        self.next_due_ns = now_ns + self.period_ns;
        self.angle += 0.5;

        if let Some(shake_period) = self.shake_period_ns {
            let slot = now_ns / shake_period;
            if slot > self.last_shake_slot {
                self.last_shake_slot = slot;
                return Ok(Some(AccelSample::new(now_ns, 1.8, 1.8, 1.2)));
            }
        }

        let phase = (now_ns / self.phase_ns) % 3;
        let (x, y, z) = self.waveform(phase);
        Ok(Some(AccelSample::new(now_ns, x, y, z)))
    }

    fn name(&self) -> &str {
        "simulated"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Replay source for testing — serves pre-loaded samples in order.
pub struct ReplaySource {
    samples: Vec<AccelSample>,
    index: usize,
}

impl ReplaySource {
    /// Create a replay source with pre-loaded samples.
    pub fn new(samples: Vec<AccelSample>) -> Self {
        Self { samples, index: 0 }
    }

    /// Create an empty source that never produces samples.
    pub fn empty() -> Self {
        Self {
            samples: vec![],
            index: 0,
        }
    }

    /// Whether every sample has been served.
    pub fn is_drained(&self) -> bool {
        self.index >= self.samples.len()
    }
}

impl SampleSource for ReplaySource {
    fn poll(&mut self) -> StrideResult<Option<AccelSample>> {
        if self.index < self.samples.len() {
            let sample = self.samples[self.index];
            self.index += 1;
            Ok(Some(sample))
        } else {
            Ok(None)
        }
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Detect the best available sample source for the current system.
pub fn detect_best_source(rate_hz: u32) -> Box<dyn SampleSource> {
    #[cfg(target_os = "linux")]
    {
        if IioSource::is_supported() {
            match IioSource::new() {
                Ok(source) => {
                    tracing::info!("Using IIO accelerometer source");
                    return Box::new(source);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to initialize IIO source, using simulator");
                }
            }
        }

        tracing::warn!(
            details = %iio_diagnostic(),
            "Using simulated sample source — no live accelerometer data"
        );
    }

    Box::new(SimulatedSource::new(rate_hz, 8.0))
}

#[cfg(target_os = "linux")]
fn iio_diagnostic() -> String {
    let root = IioSource::SYSFS_ROOT;
    let uid = unsafe { libc::geteuid() };
    let gid = unsafe { libc::getegid() };

    match std::fs::read_dir(root) {
        Ok(entries) => {
            let devices: Vec<String> = entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            format!(
                "root={root} devices=[{}] process_uid={uid} process_gid={gid}; no device exposes in_accel_x_raw",
                devices.join(",")
            )
        }
        Err(err) => format!(
            "root={root} unavailable ({err}); ensure an IIO accelerometer driver is loaded and sysfs is readable"
        ),
    }
}
