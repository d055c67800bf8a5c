//! Local address discovery through ICE candidate gathering.
//!
//! No ICE servers are configured, so gathering only ever reports host
//! candidates: addresses of the machine's own interfaces.

use std::net::IpAddr;
use std::time::Duration;

use futures::future::{select, Either};
use futures::pin_mut;

use crate::host::{Capability, HostEnvironment, IceGatherer};

fn is_reportable(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => !v4.is_loopback() && !v4.is_unspecified() && v4.octets()[0] != 0,
        IpAddr::V6(v6) => !v6.is_loopback() && !v6.is_unspecified(),
    }
}

/// IP address tokens in one `candidate:` line, loopback and all-zero
/// addresses excluded. A `%zone` suffix on a link-local address is dropped.
/// mDNS `.local` host names are not addresses and are skipped.
pub fn candidate_addresses(candidate: &str) -> Vec<String> {
    candidate
        .split_whitespace()
        .filter_map(|token| token.split('%').next())
        .filter_map(|token| token.parse::<IpAddr>().ok())
        .filter(is_reportable)
        .map(|ip| ip.to_string())
        .collect()
}

async fn gather(gatherer: &mut dyn IceGatherer, found: &mut Vec<String>) {
    while let Some(candidate) = gatherer.next_candidate().await {
        for address in candidate_addresses(&candidate) {
            if !found.contains(&address) {
                found.push(address);
            }
        }
    }
}

/// Distinct local addresses in discovery order. Returns after gathering
/// completes or `timeout` elapses, whichever comes first; the peer
/// connection is closed either way.
pub(crate) async fn discover_local_ips<H: HostEnvironment + ?Sized>(
    host: &H,
    timeout: Duration,
) -> Vec<String> {
    let mut gatherer = match host.peer_connection() {
        Ok(Capability::Available(gatherer)) => gatherer,
        Ok(Capability::Unavailable) => return Vec::new(),
        Err(e) => {
            log::debug!("local address probe degraded: {}", e);
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    let completed = {
        let gathering = gather(gatherer.as_mut(), &mut found);
        let deadline = host.sleep(timeout);
        pin_mut!(gathering, deadline);
        matches!(select(gathering, deadline).await, Either::Left(_))
    };
    gatherer.close();

    if !completed {
        log::debug!(
            "ICE gathering cut off after {}ms with {} address(es)",
            timeout.as_millis(),
            found.len()
        );
    }
    found
}
