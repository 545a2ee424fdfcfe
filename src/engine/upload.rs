use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};

use super::error::SpeedTestError;
use super::types::{ProgressSink, Settings, ThroughputResult};

/// Posts a fixed in-memory payload and times the full exchange.
pub struct UploadMeter<'a> {
    client: &'a Client,
    url: &'a str,
    size: usize,
    fill: u8,
}

impl<'a> UploadMeter<'a> {
    pub fn new(client: &'a Client, settings: &'a Settings) -> Result<Self, SpeedTestError> {
        settings.validate_upload()?;
        Ok(Self {
            client,
            url: &settings.upload_url,
            size: settings.upload_size,
            fill: settings.upload_fill_byte,
        })
    }

    /// Same size and content on every call.
    pub fn payload(&self) -> Vec<u8> {
        vec![self.fill; self.size]
    }

    /// Run the upload. Progress jumps from 0% to 100% once the response is drained.
    pub async fn measure<P>(&self, progress: &mut P) -> Result<ThroughputResult, SpeedTestError>
    where
        P: ProgressSink + ?Sized,
    {
        let payload = self.payload();
        let size = payload.len();
        info!("Uploading {size} bytes to {}", self.url);
        progress.on_progress(0.0, 0.0);

        let start = Instant::now();
        let resp = self
            .client
            .post(self.url)
            .header(CONTENT_LENGTH, size)
            .body(payload)
            .send()
            .await?;
        let resp = SpeedTestError::check_status(resp)?;
        // Server processing and response drain count toward the timing
        let _ = resp.bytes().await?;
        let elapsed = start.elapsed();

        let result = ThroughputResult::new(size as u64, elapsed);
        debug!(
            "Upload: {:.2} Mbps ({} bytes in {:.0}ms)",
            result.mbps, result.bytes, result.elapsed_ms
        );
        progress.on_progress(100.0, result.mbps);
        Ok(result)
    }
}
