use crate::engine::types::SpeedTestResult;

/// One-line summary: "Ping 12.34 ms  Download 40.00 Mbps  Upload 16.00 Mbps"
pub fn format_simple(result: &SpeedTestResult) -> String {
    format!(
        "Ping {:.2} ms  Download {:.2} Mbps  Upload {:.2} Mbps",
        result.latency.avg_ms, result.download.mbps, result.upload.mbps
    )
}

pub fn print_simple(result: &SpeedTestResult) {
    println!("{}", format_simple(result));
}
