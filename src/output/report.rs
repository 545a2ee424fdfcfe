use colored::Colorize;

use crate::engine::types::SpeedTestResult;

const RULE: &str = "-------------------------";

/// The summary rows, uncolored.
pub fn summary_lines(result: &SpeedTestResult) -> Vec<String> {
    vec![
        format!("Ping: {:.2} ms", result.latency.avg_ms),
        format!("Download: {:.2} Mbps", result.download.mbps),
        format!("Upload: {:.2} Mbps", result.upload.mbps),
    ]
}

/// Print the final results block.
pub fn print_report(result: &SpeedTestResult) {
    println!("{}", "\n📊 Final Results:".yellow());
    println!("{}", RULE.white());
    for line in summary_lines(result) {
        println!("{}", line.white());
    }
    println!("{}", format!("{RULE}\n").white());
}
