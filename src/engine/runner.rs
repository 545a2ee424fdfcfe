use tracing::info;

use super::download::DownloadMeter;
use super::error::SpeedTestError;
use super::latency::LatencyProber;
use super::types::*;
use super::upload::UploadMeter;

/// Run ping, download and upload in order. Any failure stops the run.
pub async fn run_speed_test<O>(
    client: &reqwest::Client,
    settings: &Settings,
    observer: &mut O,
) -> Result<SpeedTestResult, SpeedTestError>
where
    O: RunObserver + ?Sized,
{
    settings.validate()?;
    observer.started();

    // 1. Latency
    observer.phase_started(TestType::Latency);
    let latency = LatencyProber::new(client, settings)?.probe().await?;
    info!("Average latency {:.2}ms", latency.avg_ms);
    observer.phase_finished(TestType::Latency, latency.avg_ms);

    // 2. Download
    observer.phase_started(TestType::Download);
    let download = DownloadMeter::new(client, settings)?
        .measure(&mut *observer)
        .await?;
    info!("Download {:.2} Mbps", download.mbps);
    observer.phase_finished(TestType::Download, download.mbps);

    // 3. Upload
    observer.phase_started(TestType::Upload);
    let upload = UploadMeter::new(client, settings)?
        .measure(&mut *observer)
        .await?;
    info!("Upload {:.2} Mbps", upload.mbps);
    observer.phase_finished(TestType::Upload, upload.mbps);

    Ok(SpeedTestResult {
        latency,
        download,
        upload,
    })
}
