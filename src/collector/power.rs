//! Battery and storage estimates. Both groups are `None` when the host
//! lacks the API, rather than filled with sentinels.

use crate::format::{format_bytes, format_duration, to_fixed};
use crate::host::{BatteryReading, Capability, HostEnvironment, StorageReading};
use crate::snapshot::{BatteryInfo, StorageInfo};

pub fn describe_battery(reading: &BatteryReading) -> BatteryInfo {
    BatteryInfo {
        level: format!("{}%", (reading.level * 100.0).round() as i64),
        charging: reading.charging,
        time_to_full: format_duration(reading.charging_time),
        time_to_empty: format_duration(reading.discharging_time),
    }
}

/// `None` without a positive quota.
pub fn describe_storage(reading: &StorageReading) -> Option<StorageInfo> {
    let quota = reading.quota.filter(|q| q.is_finite() && *q > 0.0)?;
    let usage = reading.usage.filter(|u| u.is_finite()).unwrap_or(0.0);
    let percent = if usage > 0.0 {
        to_fixed(usage / quota * 100.0, 1)
    } else {
        "0".into()
    };

    Some(StorageInfo {
        quota: format_bytes(quota),
        used: format_bytes(usage),
        percent: format!("{}%", percent),
    })
}

pub(crate) async fn battery_info<H: HostEnvironment + ?Sized>(host: &H) -> Option<BatteryInfo> {
    match host.battery().await {
        Ok(Capability::Available(reading)) => Some(describe_battery(&reading)),
        Ok(Capability::Unavailable) => None,
        Err(e) => {
            log::debug!("battery probe degraded: {}", e);
            None
        }
    }
}

pub(crate) async fn storage_info<H: HostEnvironment + ?Sized>(host: &H) -> Option<StorageInfo> {
    match host.storage_estimate().await {
        Ok(Capability::Available(reading)) => describe_storage(&reading),
        Ok(Capability::Unavailable) => None,
        Err(e) => {
            log::debug!("storage probe degraded: {}", e);
            None
        }
    }
}
