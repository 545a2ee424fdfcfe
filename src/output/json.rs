use crate::engine::types::SpeedTestResult;

pub fn print_json(result: &SpeedTestResult) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string(result)?);
    Ok(())
}

pub fn print_json_pretty(result: &SpeedTestResult) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
