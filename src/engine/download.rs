use futures::{Stream, StreamExt};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::SpeedTestError;
use super::types::{ProgressSink, Settings, ThroughputResult, TransferProgress};

/// Streams one file and measures how fast it arrives.
pub struct DownloadMeter<'a> {
    client: &'a Client,
    url: &'a str,
    fallback_size: u64,
}

impl<'a> DownloadMeter<'a> {
    pub fn new(client: &'a Client, settings: &'a Settings) -> Result<Self, SpeedTestError> {
        settings.validate_download()?;
        Ok(Self {
            client,
            url: &settings.download_url,
            fallback_size: settings.download_fallback_size,
        })
    }

    /// Run the download, reporting progress once per received chunk.
    pub async fn measure<P>(&self, progress: &mut P) -> Result<ThroughputResult, SpeedTestError>
    where
        P: ProgressSink + ?Sized,
    {
        info!("Downloading {}", self.url);
        let resp = self.client.get(self.url).send().await?;
        let resp = SpeedTestError::check_status(resp)?;

        let content_length = resp.content_length();
        let expected_total = expected_total(content_length, self.fallback_size);
        if content_length.unwrap_or(0) == 0 {
            warn!(
                "No content-length from {}, assuming {} bytes for progress",
                self.url, self.fallback_size
            );
        }

        let result = consume_body(resp.bytes_stream(), expected_total, progress).await?;
        debug!(
            "Download: {:.2} Mbps ({} bytes in {:.0}ms)",
            result.mbps, result.bytes, result.elapsed_ms
        );
        Ok(result)
    }
}

/// Total used for the progress percentage. A missing or zero length falls back.
fn expected_total(content_length: Option<u64>, fallback: u64) -> u64 {
    match content_length {
        Some(len) if len > 0 => len,
        _ => fallback,
    }
}

/// Pull chunks until the stream ends. The clock starts once the headers are in.
///
/// The returned speed uses the bytes actually received, not `expected_total`.
pub async fn consume_body<S, B, E, P>(
    stream: S,
    expected_total: u64,
    progress: &mut P,
) -> Result<ThroughputResult, SpeedTestError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    SpeedTestError: From<E>,
    P: ProgressSink + ?Sized,
{
    futures::pin_mut!(stream);
    let mut transfer = TransferProgress::new(expected_total);
    progress.on_progress(0.0, 0.0);

    let start = Instant::now();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let (percent, mbps) = transfer.record(chunk.as_ref().len(), start.elapsed());
        progress.on_progress(percent, mbps);
    }

    Ok(transfer.finish(start.elapsed()))
}
