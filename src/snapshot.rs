//! The device snapshot produced by one collection run.
//!
//! Serializes to the camelCase object shape page scripts consume
//! (`snapshot.browser.name`, `snapshot.fingerprint.visitorId`,
//! `snapshot.network.localIPs`, ...). Raw values kept only for the visitor
//! id are not serialized.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::host::{PermissionName, PermissionState};
use crate::visitor_id::VisitorIdInputs;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserInfo {
    pub name: String,
    pub version: String,
    pub engine: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// `mobile`, `tablet`, `desktop`, ...
    #[serde(rename = "type")]
    pub device_type: String,
    pub vendor: String,
    pub model: String,
}

/// What the user-agent string says about the browser, OS and device.
pub(crate) struct Identity {
    pub browser: BrowserInfo,
    pub os: OsInfo,
    pub device: DeviceInfo,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenProfile {
    pub resolution: String,
    pub viewport: String,
    pub pixel_ratio: f64,
    pub color_depth: u32,
    pub max_touch_points: u32,
    pub orientation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub online: bool,
    pub connection_type: String,
    pub downlink: String,
    pub language: String,
    pub languages: String,
    pub timezone: String,
    /// `UTC+HH:MM`
    pub timezone_offset: String,
    #[serde(skip)]
    pub timezone_offset_minutes: i32,
    pub do_not_track: String,
    pub cookies_enabled: bool,
    #[serde(rename = "localIPs")]
    pub local_ips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    /// Logical cores, 0 when the browser does not say.
    pub hardware_concurrency: u32,
    #[serde(skip)]
    pub hardware_concurrency_reported: Option<u32>,
    /// `"8 GB"` or `"unknown"`.
    pub device_memory: String,
    #[serde(skip)]
    pub device_memory_gb: Option<f64>,
    pub platform: String,
    pub pdf_viewer_enabled: bool,
    pub heap_used: String,
    pub heap_total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintSignals {
    pub visitor_id: String,
    pub canvas: String,
    pub audio: String,
    #[serde(rename = "webGLVendor")]
    pub webgl_vendor: String,
    #[serde(rename = "webGLRenderer")]
    pub webgl_renderer: String,
    pub plugins: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    /// `"87%"`
    pub level: String,
    pub charging: bool,
    pub time_to_full: String,
    pub time_to_empty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub quota: String,
    pub used: String,
    /// `"12.5%"`
    pub percent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PermissionStates(BTreeMap<PermissionName, PermissionState>);

impl PermissionStates {
    pub fn get(&self, name: PermissionName) -> Option<PermissionState> {
        self.0.get(&name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PermissionName, PermissionState)> + '_ {
        self.0.iter().map(|(name, state)| (*name, *state))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PermissionName, PermissionState)> for PermissionStates {
    fn from_iter<I: IntoIterator<Item = (PermissionName, PermissionState)>>(iter: I) -> Self {
        PermissionStates(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// `Dark` / `Light`
    pub dark_mode: String,
    /// `Yes` / `No`
    pub reduced_motion: String,
    /// `Yes` / `No` (forced colors)
    pub high_contrast: String,
    /// `dark` / `light`
    pub color_scheme: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDeviceCounts {
    pub cameras: u32,
    pub microphones: u32,
    pub speakers: u32,
    pub speech_voices: u32,
}

/// One complete collection result. Read-only once assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    browser: BrowserInfo,
    os: OsInfo,
    device: DeviceInfo,
    #[serde(skip)]
    user_agent: String,
    screen: ScreenProfile,
    network: NetworkProfile,
    hardware: HardwareProfile,
    fingerprint: FingerprintSignals,
    battery: Option<BatteryInfo>,
    storage: Option<StorageInfo>,
    permissions: PermissionStates,
    preferences: UserPreferences,
    media: MediaDeviceCounts,
}

/// Probe output before the visitor id is derived.
pub(crate) struct SnapshotParts {
    pub identity: Identity,
    pub screen: ScreenProfile,
    pub network: NetworkProfile,
    pub hardware: HardwareProfile,
    pub canvas: String,
    pub audio: String,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub plugins: String,
    pub battery: Option<BatteryInfo>,
    pub storage: Option<StorageInfo>,
    pub permissions: PermissionStates,
    pub preferences: UserPreferences,
    pub media: MediaDeviceCounts,
}

impl DeviceSnapshot {
    /// Assemble the snapshot, deriving the visitor id from the parts it is
    /// defined over.
    pub(crate) fn assemble(parts: SnapshotParts) -> Self {
        let inputs = VisitorIdInputs {
            user_agent: parts.identity.user_agent.clone(),
            language: parts.network.language.clone(),
            color_depth: parts.screen.color_depth,
            timezone_offset_minutes: parts.network.timezone_offset_minutes,
            canvas_signature: parts.canvas.clone(),
            hardware_concurrency: parts.hardware.hardware_concurrency_reported,
            device_memory: parts.hardware.device_memory_gb,
        };

        Self {
            fingerprint: FingerprintSignals {
                visitor_id: inputs.visitor_id(),
                canvas: parts.canvas,
                audio: parts.audio,
                webgl_vendor: parts.webgl_vendor,
                webgl_renderer: parts.webgl_renderer,
                plugins: parts.plugins,
            },
            browser: parts.identity.browser,
            os: parts.identity.os,
            device: parts.identity.device,
            user_agent: parts.identity.user_agent,
            screen: parts.screen,
            network: parts.network,
            hardware: parts.hardware,
            battery: parts.battery,
            storage: parts.storage,
            permissions: parts.permissions,
            preferences: parts.preferences,
            media: parts.media,
        }
    }

    /// The inputs `visitor_id` was derived from.
    pub fn visitor_id_inputs(&self) -> VisitorIdInputs {
        VisitorIdInputs {
            user_agent: self.user_agent.clone(),
            language: self.network.language.clone(),
            color_depth: self.screen.color_depth,
            timezone_offset_minutes: self.network.timezone_offset_minutes,
            canvas_signature: self.fingerprint.canvas.clone(),
            hardware_concurrency: self.hardware.hardware_concurrency_reported,
            device_memory: self.hardware.device_memory_gb,
        }
    }

    pub fn visitor_id(&self) -> &str {
        &self.fingerprint.visitor_id
    }

    pub fn browser(&self) -> &BrowserInfo {
        &self.browser
    }

    pub fn os(&self) -> &OsInfo {
        &self.os
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn screen(&self) -> &ScreenProfile {
        &self.screen
    }

    pub fn network(&self) -> &NetworkProfile {
        &self.network
    }

    pub fn hardware(&self) -> &HardwareProfile {
        &self.hardware
    }

    pub fn fingerprint(&self) -> &FingerprintSignals {
        &self.fingerprint
    }

    pub fn battery(&self) -> Option<&BatteryInfo> {
        self.battery.as_ref()
    }

    pub fn storage(&self) -> Option<&StorageInfo> {
        self.storage.as_ref()
    }

    pub fn permissions(&self) -> &PermissionStates {
        &self.permissions
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn media(&self) -> &MediaDeviceCounts {
        &self.media
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
