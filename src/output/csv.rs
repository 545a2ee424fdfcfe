use std::io::Write;

use crate::engine::types::SpeedTestResult;

pub fn write_csv<W: Write>(writer: W, result: &SpeedTestResult) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["test_type", "value", "unit"])?;
    wtr.write_record([
        "latency",
        &format!("{:.2}", result.latency.avg_ms),
        "ms",
    ])?;
    wtr.write_record(["download", &format!("{:.2}", result.download.mbps), "Mbps"])?;
    wtr.write_record(["upload", &format!("{:.2}", result.upload.mbps), "Mbps"])?;

    wtr.flush()?;
    Ok(())
}

pub fn print_csv(result: &SpeedTestResult) -> csv::Result<()> {
    write_csv(std::io::stdout(), result)
}
