use reqwest::Client;
use std::net::IpAddr;
use std::time::Duration;

use super::error::SpeedTestError;

/// Build an async reqwest client, optionally bound to a local address.
///
/// No timeout is applied unless one is given.
pub fn build_client(
    local_addr: Option<IpAddr>,
    timeout: Option<Duration>,
) -> Result<Client, SpeedTestError> {
    let mut builder = Client::builder();

    if let Some(addr) = local_addr {
        builder = builder.local_address(addr);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}

/// Parse an `--ipv4`/`--ipv6` value into a bind address of the right family.
pub fn parse_local_addr(value: &str, want_v6: bool) -> Result<IpAddr, SpeedTestError> {
    let addr: IpAddr = value
        .parse()
        .map_err(|_| SpeedTestError::InvalidAddress(value.to_string()))?;
    if addr.is_ipv6() != want_v6 {
        let family = if want_v6 { "IPv6" } else { "IPv4" };
        return Err(SpeedTestError::InvalidAddress(format!(
            "{value} is not an {family} address"
        )));
    }
    Ok(addr)
}
