use clap::Parser;
use clap_complete::Shell;
use std::net::IpAddr;
use std::time::Duration;

use crate::engine::client::parse_local_addr;
use crate::engine::error::SpeedTestError;
use crate::engine::types::{
    Settings, DEFAULT_DOWNLOAD_URL, DEFAULT_PING_SAMPLES, DEFAULT_PING_URL, DEFAULT_UPLOAD_URL,
};

/// Which output mode was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Console,
    Simple,
    Json,
    JsonPretty,
    Csv,
}

/// Measure ping, download and upload speed
#[derive(Parser, Debug)]
#[command(name = "netspeed", version, about)]
pub struct Cli {
    /// URL probed for latency
    #[arg(long = "ping-url", default_value = DEFAULT_PING_URL)]
    pub ping_url: String,

    /// File downloaded for the download test
    #[arg(long = "download-url", default_value = DEFAULT_DOWNLOAD_URL)]
    pub download_url: String,

    /// Endpoint that accepts the upload POST
    #[arg(long = "upload-url", default_value = DEFAULT_UPLOAD_URL)]
    pub upload_url: String,

    /// Number of latency probes
    #[arg(long = "ping-samples", default_value_t = DEFAULT_PING_SAMPLES, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub ping_samples: u32,

    /// Abort any request that takes longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// One-line output
    #[arg(long)]
    pub simple: bool,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Pretty JSON output
    #[arg(long = "json-pretty")]
    pub json_pretty: bool,

    /// CSV output
    #[arg(long)]
    pub csv: bool,

    /// Force IPv4 with optional source address
    #[arg(long, num_args = 0..=1, default_missing_value = "0.0.0.0", conflicts_with = "ipv6")]
    pub ipv4: Option<String>,

    /// Force IPv6 with optional source address
    #[arg(long, num_args = 0..=1, default_missing_value = "::", conflicts_with = "ipv4")]
    pub ipv6: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[arg(long = "generate-completion", value_name = "SHELL")]
    pub completion: Option<Shell>,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.simple {
            OutputMode::Simple
        } else if self.json {
            OutputMode::Json
        } else if self.json_pretty {
            OutputMode::JsonPretty
        } else if self.csv {
            OutputMode::Csv
        } else {
            OutputMode::Console
        }
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            ping_url: self.ping_url.clone(),
            download_url: self.download_url.clone(),
            upload_url: self.upload_url.clone(),
            ping_samples: self.ping_samples,
            ..Settings::default()
        }
    }

    pub fn local_addr(&self) -> Result<Option<IpAddr>, SpeedTestError> {
        match (&self.ipv4, &self.ipv6) {
            (Some(v4), _) => parse_local_addr(v4, false).map(Some),
            (_, Some(v6)) => parse_local_addr(v6, true).map(Some),
            _ => Ok(None),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
