//! Synchronous property probes: navigator, screen, timezone, heap, plugins
//! and preference media queries.

use crate::config::ProbeConstants;
use crate::error::Result;
use crate::format::{format_bytes, format_utc_offset, js_number};
use crate::host::{Capability, HostEnvironment, NavigatorReading, ScreenReading, TimezoneReading};
use crate::snapshot::{
    BrowserInfo, DeviceInfo, HardwareProfile, Identity, NetworkProfile, OsInfo, ScreenProfile,
    UserPreferences,
};
use crate::user_agent::UserAgentInfo;

const UNAVAILABLE: &str = "unavailable";

/// Unwrap a probe result, logging and discarding the failure.
pub(crate) fn settle<T>(probe: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_absent() => {
            log::debug!("{} probe degraded: {}", probe, e);
            None
        }
        Err(e) => {
            log::warn!("{} probe refused: {}", probe, e);
            None
        }
    }
}

fn or_unknown(value: Option<String>, fallback: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| fallback.to_string())
}

pub(crate) fn browser_identity(navigator: Option<&NavigatorReading>) -> Identity {
    let user_agent = navigator.map(|n| n.user_agent.clone()).unwrap_or_default();
    let ua = UserAgentInfo::parse(&user_agent);

    Identity {
        browser: BrowserInfo {
            name: or_unknown(ua.browser_name, "Unknown"),
            version: or_unknown(ua.browser_version, "Unknown"),
            engine: or_unknown(ua.engine, "Unknown"),
        },
        os: OsInfo {
            name: or_unknown(ua.os_name, "Unknown"),
            version: or_unknown(ua.os_version, "Unknown"),
        },
        device: DeviceInfo {
            device_type: or_unknown(ua.device_type, "desktop"),
            vendor: or_unknown(ua.device_vendor, "Unknown"),
            model: or_unknown(ua.device_model, "Unknown"),
        },
        user_agent,
    }
}

pub(crate) fn screen_profile(
    screen: Option<&ScreenReading>,
    navigator: Option<&NavigatorReading>,
) -> ScreenProfile {
    let max_touch_points = navigator.and_then(|n| n.max_touch_points).unwrap_or(0);

    match screen {
        Some(s) => ScreenProfile {
            resolution: format!("{}x{}", s.width, s.height),
            viewport: format!("{}x{}", js_number(s.viewport_width), js_number(s.viewport_height)),
            pixel_ratio: (s.pixel_ratio * 100.0).round() / 100.0,
            color_depth: s.color_depth,
            max_touch_points,
            orientation: s
                .orientation
                .as_deref()
                .map(|o| o.replace('-', " "))
                .unwrap_or_else(|| "unknown".into()),
        },
        None => ScreenProfile {
            resolution: UNAVAILABLE.into(),
            viewport: UNAVAILABLE.into(),
            pixel_ratio: 0.0,
            color_depth: 0,
            max_touch_points,
            orientation: "unknown".into(),
        },
    }
}

pub(crate) fn network_profile(
    navigator: Option<&NavigatorReading>,
    timezone: Option<&TimezoneReading>,
    local_ips: Vec<String>,
) -> NetworkProfile {
    let (timezone_name, timezone_offset, timezone_offset_minutes) = match timezone {
        Some(tz) => (
            or_unknown(tz.name.clone(), "unknown"),
            format_utc_offset(tz.offset_minutes),
            tz.offset_minutes,
        ),
        None => (UNAVAILABLE.into(), UNAVAILABLE.into(), 0),
    };

    let Some(nav) = navigator else {
        return NetworkProfile {
            online: false,
            connection_type: UNAVAILABLE.into(),
            downlink: UNAVAILABLE.into(),
            language: UNAVAILABLE.into(),
            languages: UNAVAILABLE.into(),
            timezone: timezone_name,
            timezone_offset,
            timezone_offset_minutes,
            do_not_track: UNAVAILABLE.into(),
            cookies_enabled: false,
            local_ips,
        };
    };

    let connection = nav.connection.as_ref();
    let connection_type = connection
        .and_then(|c| c.effective_type.clone().or_else(|| c.connection_type.clone()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let downlink = connection
        .and_then(|c| c.downlink)
        .filter(|d| *d != 0.0 && d.is_finite())
        .map(|d| format!("{} Mbps", js_number(d)))
        .unwrap_or_else(|| "unknown".into());

    let language = or_unknown(nav.language.clone(), "unknown");
    let languages = if nav.languages.is_empty() {
        language.clone()
    } else {
        nav.languages.join(", ")
    };

    NetworkProfile {
        online: nav.online,
        connection_type,
        downlink,
        language,
        languages,
        timezone: timezone_name,
        timezone_offset,
        timezone_offset_minutes,
        do_not_track: nav.do_not_track.clone().unwrap_or_else(|| "not set".into()),
        cookies_enabled: nav.cookies_enabled,
        local_ips,
    }
}

/// `(used, total)` script heap, `N/A` where the engine does not expose it.
pub(crate) fn heap_usage<H: HostEnvironment + ?Sized>(host: &H) -> (String, String) {
    match settle("heap", host.heap()) {
        Some(Capability::Available(heap)) => {
            (format_bytes(heap.used_bytes), format_bytes(heap.total_bytes))
        }
        _ => ("N/A".into(), "N/A".into()),
    }
}

pub(crate) fn hardware_profile(
    navigator: Option<&NavigatorReading>,
    heap_used: String,
    heap_total: String,
) -> HardwareProfile {
    let Some(nav) = navigator else {
        return HardwareProfile {
            hardware_concurrency: 0,
            hardware_concurrency_reported: None,
            device_memory: UNAVAILABLE.into(),
            device_memory_gb: None,
            platform: UNAVAILABLE.into(),
            pdf_viewer_enabled: false,
            heap_used,
            heap_total,
        };
    };

    let device_memory_gb = nav.device_memory.filter(|m| m.is_finite());
    let hardware_concurrency_reported = nav
        .hardware_concurrency
        .filter(|c| c.is_finite() && *c >= 0.0)
        .map(|c| c as u32);
    HardwareProfile {
        hardware_concurrency: hardware_concurrency_reported.unwrap_or(0),
        hardware_concurrency_reported,
        device_memory: device_memory_gb
            .filter(|m| *m > 0.0)
            .map(|m| format!("{} GB", js_number(m)))
            .unwrap_or_else(|| "unknown".into()),
        device_memory_gb,
        platform: or_unknown(nav.platform.clone(), "Unknown"),
        pdf_viewer_enabled: nav.pdf_viewer_enabled.unwrap_or(false),
        heap_used,
        heap_total,
    }
}

/// First `preview` plugin names, comma separated, with a `+N more` tail.
pub fn summarize_plugins(names: &[String], preview: usize) -> String {
    if names.is_empty() {
        return "none".into();
    }
    let mut summary = names
        .iter()
        .take(preview)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > preview {
        summary.push_str(&format!(" +{} more", names.len() - preview));
    }
    summary
}

pub(crate) fn plugin_summary<H: HostEnvironment + ?Sized>(host: &H, preview: usize) -> String {
    match settle("plugins", host.plugins()) {
        Some(names) => summarize_plugins(&names, preview),
        None => "inaccessible".into(),
    }
}

pub(crate) fn preferences<H: HostEnvironment + ?Sized>(host: &H) -> UserPreferences {
    let query = |q: &str| settle("media query", host.media_query(q));
    let label = |matched: Option<bool>, yes: &str, no: &str| -> String {
        match matched {
            Some(true) => yes.into(),
            Some(false) => no.into(),
            None => UNAVAILABLE.into(),
        }
    };

    let dark = query(ProbeConstants::QUERY_DARK_MODE);
    UserPreferences {
        dark_mode: label(dark, "Dark", "Light"),
        reduced_motion: label(query(ProbeConstants::QUERY_REDUCED_MOTION), "Yes", "No"),
        high_contrast: label(query(ProbeConstants::QUERY_FORCED_COLORS), "Yes", "No"),
        color_scheme: label(dark, "dark", "light"),
    }
}
