use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info};

use super::error::SpeedTestError;
use super::types::{LatencyResult, Settings};

/// Repeated round trips against one URL.
pub struct LatencyProber<'a> {
    client: &'a Client,
    url: &'a str,
    samples: u32,
}

impl<'a> LatencyProber<'a> {
    pub fn new(client: &'a Client, settings: &'a Settings) -> Result<Self, SpeedTestError> {
        settings.validate_latency()?;
        Ok(Self {
            client,
            url: &settings.ping_url,
            samples: settings.ping_samples,
        })
    }

    /// Run every probe in sequence. The first failure aborts the whole run.
    pub async fn probe(&self) -> Result<LatencyResult, SpeedTestError> {
        info!("Running {} latency probes against {}", self.samples, self.url);
        let mut samples = Vec::with_capacity(self.samples as usize);
        for i in 0..self.samples {
            let rtt_ms = self.probe_once().await?;
            debug!("Latency probe {}/{}: {rtt_ms:.2}ms", i + 1, self.samples);
            samples.push(rtt_ms);
        }
        Ok(summarize(samples))
    }

    /// Time from sending the request to receiving the response headers.
    async fn probe_once(&self) -> Result<f64, SpeedTestError> {
        let start = Instant::now();
        let resp = self.client.get(self.url).send().await?;
        let rtt_ms = start.elapsed().as_secs_f64() * 1000.0;
        let resp = SpeedTestError::check_status(resp)?;

        // Drain outside the timed window so the connection can be reused
        let _ = resp.bytes().await?;
        Ok(rtt_ms)
    }
}

fn summarize(samples: Vec<f64>) -> LatencyResult {
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    LatencyResult {
        avg_ms: mean(&samples),
        min_ms: if min.is_infinite() { 0.0 } else { min },
        max_ms: if max.is_infinite() { 0.0 } else { max },
        samples,
    }
}

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_mean_of_five_samples() {
        let avg = mean(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(format!("{avg:.2}"), "30.00");
    }

    #[test]
    fn test_summarize() {
        let result = summarize(vec![12.5, 7.5, 10.0]);
        assert_eq!(result.avg_ms, 10.0);
        assert_eq!(result.min_ms, 7.5);
        assert_eq!(result.max_ms, 12.5);
        assert_eq!(result.samples.len(), 3);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let client = Client::new();
        let settings = Settings {
            ping_samples: 0,
            ..Settings::default()
        };
        assert!(matches!(
            LatencyProber::new(&client, &settings),
            Err(SpeedTestError::InvalidSettings(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_issues_exact_sample_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .expect(5)
            .mount(&server)
            .await;

        let client = Client::new();
        let settings = Settings {
            ping_url: format!("{}/ping", server.uri()),
            ..Settings::default()
        };
        let result = LatencyProber::new(&client, &settings)
            .unwrap()
            .probe()
            .await
            .unwrap();

        assert_eq!(result.samples.len(), 5);
        assert!(result.avg_ms > 0.0);
        assert!(result.min_ms <= result.avg_ms && result.avg_ms <= result.max_ms);
    }

    #[tokio::test]
    async fn test_probe_aborts_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let settings = Settings {
            ping_url: format!("{}/ping", server.uri()),
            ..Settings::default()
        };
        let err = LatencyProber::new(&client, &settings)
            .unwrap()
            .probe()
            .await
            .unwrap_err();

        assert!(matches!(err, SpeedTestError::Status { status, .. } if status == 503));
    }
}
