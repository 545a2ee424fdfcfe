use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeedTestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid local address: {0}")]
    InvalidAddress(String),
}

impl SpeedTestError {
    /// Turn a non-success response into an error.
    pub(crate) fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Self> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(SpeedTestError::Status {
                url: resp.url().to_string(),
                status,
            })
        }
    }
}
