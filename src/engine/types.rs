use serde::Serialize;
use std::fmt;
use std::time::Duration;

use super::error::SpeedTestError;

pub const DEFAULT_PING_URL: &str = "https://google.com";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://proof.ovh.net/files/10Mb.dat";
pub const DEFAULT_UPLOAD_URL: &str = "https://postman-echo.com/post";

pub const DEFAULT_PING_SAMPLES: u32 = 5;
pub const MIB: usize = 1024 * 1024;
pub const DEFAULT_UPLOAD_SIZE: usize = 2 * MIB;
pub const DEFAULT_DOWNLOAD_FALLBACK_SIZE: u64 = 10 * MIB as u64;

const BITS_PER_MEGABIT: f64 = 1_048_576.0;

/// Which measurement a phase performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Latency,
    Download,
    Upload,
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Latency => write!(f, "Ping"),
            TestType::Download => write!(f, "Download"),
            TestType::Upload => write!(f, "Upload"),
        }
    }
}

/// Endpoints and sizes for one run. Built once, shared read-only by every meter.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ping_url: String,
    pub download_url: String,
    pub upload_url: String,
    pub ping_samples: u32,
    pub upload_size: usize,
    /// Assumed download size when the server omits content-length.
    /// Only drives the progress percentage, never the measured speed.
    pub download_fallback_size: u64,
    pub upload_fill_byte: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ping_url: DEFAULT_PING_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            ping_samples: DEFAULT_PING_SAMPLES,
            upload_size: DEFAULT_UPLOAD_SIZE,
            download_fallback_size: DEFAULT_DOWNLOAD_FALLBACK_SIZE,
            upload_fill_byte: b'x',
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SpeedTestError> {
        self.validate_latency()?;
        self.validate_download()?;
        self.validate_upload()
    }

    pub fn validate_latency(&self) -> Result<(), SpeedTestError> {
        if self.ping_samples == 0 {
            return Err(SpeedTestError::InvalidSettings(
                "ping sample count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_download(&self) -> Result<(), SpeedTestError> {
        if self.download_fallback_size == 0 {
            return Err(SpeedTestError::InvalidSettings(
                "download fallback size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_upload(&self) -> Result<(), SpeedTestError> {
        if self.upload_size == 0 {
            return Err(SpeedTestError::InvalidSettings(
                "upload payload size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregated latency results.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyResult {
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub samples: Vec<f64>,
}

/// Result of one throughput transfer.
#[derive(Debug, Clone, Serialize)]
pub struct ThroughputResult {
    pub mbps: f64,
    pub bytes: u64,
    pub elapsed_ms: f64,
}

impl ThroughputResult {
    pub fn new(bytes: u64, elapsed: Duration) -> Self {
        Self {
            mbps: mbps(bytes, elapsed),
            bytes,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Final result of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedTestResult {
    pub latency: LatencyResult,
    pub download: ThroughputResult,
    pub upload: ThroughputResult,
}

/// Throughput in binary megabits per second.
///
/// `bytes * 8 / seconds / 1_048_576`. A zero elapsed time yields 0.0.
pub fn mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    (bytes as f64 * 8.0) / secs / BITS_PER_MEGABIT
}

/// Share of `expected_total` already transferred, clamped to 100.
pub fn percent_complete(bytes: u64, expected_total: u64) -> f64 {
    if expected_total == 0 {
        return 100.0;
    }
    ((bytes as f64 / expected_total as f64) * 100.0).min(100.0)
}

/// Running state of a single transfer.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    bytes: u64,
    expected_total: u64,
    elapsed: Duration,
}

impl TransferProgress {
    pub fn new(expected_total: u64) -> Self {
        Self {
            bytes: 0,
            expected_total,
            elapsed: Duration::ZERO,
        }
    }

    /// Account for one received chunk and return `(percent, mbps)` so far.
    ///
    /// `elapsed` is measured from the fixed transfer start.
    pub fn record(&mut self, chunk_len: usize, elapsed: Duration) -> (f64, f64) {
        self.bytes += chunk_len as u64;
        self.elapsed = elapsed;
        (self.percent(), self.mbps())
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn percent(&self) -> f64 {
        percent_complete(self.bytes, self.expected_total)
    }

    pub fn mbps(&self) -> f64 {
        mbps(self.bytes, self.elapsed)
    }

    /// Close the transfer using the actual byte count.
    pub fn finish(self, elapsed: Duration) -> ThroughputResult {
        ThroughputResult::new(self.bytes, elapsed)
    }
}

/// Receives live progress from a running transfer.
pub trait ProgressSink {
    fn on_progress(&mut self, percent: f64, mbps: f64);
}

impl<F> ProgressSink for F
where
    F: FnMut(f64, f64),
{
    fn on_progress(&mut self, percent: f64, mbps: f64) {
        self(percent, mbps)
    }
}

/// Hooks into the whole pipeline. Every method defaults to doing nothing.
pub trait RunObserver: ProgressSink {
    fn started(&mut self) {}

    fn phase_started(&mut self, _test_type: TestType) {}

    /// `value` is milliseconds for latency, Mbps otherwise.
    fn phase_finished(&mut self, _test_type: TestType, _value: f64) {}
}

/// Observer for modes that must keep stdout clean.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuietObserver;

impl ProgressSink for QuietObserver {
    fn on_progress(&mut self, _percent: f64, _mbps: f64) {}
}

impl RunObserver for QuietObserver {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mbps_one_mib_per_second() {
        let v = mbps(1_048_576, Duration::from_secs(1));
        assert_eq!(format!("{v:.2}"), "8.00");
    }

    #[test]
    fn test_mbps_zero_elapsed() {
        assert_eq!(mbps(1_000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_mbps_reference_transfers() {
        let download = mbps(10 * MIB as u64, Duration::from_secs(2));
        assert_eq!(format!("{download:.2}"), "40.00");
        let upload = mbps(DEFAULT_UPLOAD_SIZE as u64, Duration::from_secs(1));
        assert_eq!(format!("{upload:.2}"), "16.00");
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(percent_complete(50, 100), 50.0);
        assert_eq!(percent_complete(100, 100), 100.0);
        assert_eq!(percent_complete(250, 100), 100.0);
        assert_eq!(percent_complete(1, 0), 100.0);
    }

    #[test]
    fn test_transfer_progress_is_split_independent() {
        let total = 1_000_000usize;
        let elapsed = Duration::from_millis(1_500);
        let splits: [&[usize]; 3] = [
            &[1_000_000],
            &[500_000, 500_000],
            &[1, 99_999, 300_000, 600_000],
        ];

        let results: Vec<f64> = splits
            .iter()
            .map(|chunks| {
                assert_eq!(chunks.iter().sum::<usize>(), total);
                let mut progress = TransferProgress::new(total as u64);
                for (i, len) in chunks.iter().enumerate() {
                    let at = elapsed * (i as u32 + 1) / chunks.len() as u32;
                    progress.record(*len, at);
                }
                progress.finish(elapsed).mbps
            })
            .collect();

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0], mbps(total as u64, elapsed));
    }

    #[test]
    fn test_transfer_progress_monotonic_and_capped() {
        let mut progress = TransferProgress::new(1_000);
        let mut last_bytes = 0;
        for i in 1..=6u64 {
            let (percent, _) = progress.record(400, Duration::from_millis(i * 10));
            assert!(progress.bytes() >= last_bytes);
            assert!(percent <= 100.0);
            last_bytes = progress.bytes();
        }
        assert_eq!(progress.bytes(), 2_400);
        assert_eq!(progress.percent(), 100.0);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ping_samples, 5);
        assert_eq!(settings.upload_size, 2_097_152);
        assert_eq!(settings.download_fallback_size, 10_485_760);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_rejects_zero_samples() {
        let settings = Settings {
            ping_samples: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SpeedTestError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_settings_checks_are_per_meter() {
        let settings = Settings {
            ping_samples: 0,
            ..Settings::default()
        };
        assert!(settings.validate_latency().is_err());
        assert!(settings.validate_download().is_ok());
        assert!(settings.validate_upload().is_ok());

        let settings = Settings {
            download_fallback_size: 0,
            ..Settings::default()
        };
        assert!(settings.validate_download().is_err());
        assert!(settings.validate_latency().is_ok());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_rejects_empty_upload() {
        let settings = Settings {
            upload_size: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_closure_as_progress_sink() {
        let mut seen = Vec::new();
        let mut sink = |p: f64, m: f64| seen.push((p, m));
        sink.on_progress(10.0, 1.5);
        sink.on_progress(100.0, 2.0);
        assert_eq!(seen, vec![(10.0, 1.5), (100.0, 2.0)]);
    }
}
