//! Host capability interface.
//!
//! The collector never touches `window`, `navigator` or `screen` directly.
//! Everything it reads goes through [`HostEnvironment`], one method per probe
//! family, so the same collection logic runs against the real browser
//! ([`crate::browser::BrowserHost`]) or a scripted fake in tests.
//!
//! Vendor-prefixed and optional APIs are resolved once, inside the host, and
//! reported as a [`Capability`]: the collector only ever sees "here is a
//! handle" or "this host has none".

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::location::GeoFix;

/// Result of resolving an optional host API.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability<T> {
    Available(T),
    Unavailable,
}

impl<T> Capability<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Capability::Available(v),
            None => Capability::Unavailable,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Capability::Available(v) => Some(v),
            Capability::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Capability<U> {
        match self {
            Capability::Available(v) => Capability::Available(f(v)),
            Capability::Unavailable => Capability::Unavailable,
        }
    }
}

/// Raw `navigator` properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigatorReading {
    pub user_agent: String,
    pub language: Option<String>,
    pub languages: Vec<String>,
    pub platform: Option<String>,
    pub hardware_concurrency: Option<f64>,
    /// `navigator.deviceMemory`, in GB.
    pub device_memory: Option<f64>,
    pub max_touch_points: Option<u32>,
    pub online: bool,
    pub cookies_enabled: bool,
    pub do_not_track: Option<String>,
    pub pdf_viewer_enabled: Option<bool>,
    /// `navigator.connection` (or its moz/webkit prefixed twin).
    pub connection: Option<ConnectionReading>,
}

/// Network Information API values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionReading {
    pub effective_type: Option<String>,
    pub connection_type: Option<String>,
    /// Mbps.
    pub downlink: Option<f64>,
}

/// Raw `screen` / `window` geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReading {
    pub width: i32,
    pub height: i32,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub pixel_ratio: f64,
    pub color_depth: u32,
    /// `screen.orientation.type`, e.g. `landscape-primary`.
    pub orientation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimezoneReading {
    /// IANA name from `Intl.DateTimeFormat().resolvedOptions()`.
    pub name: Option<String>,
    /// `Date.getTimezoneOffset()`: minutes behind UTC.
    pub offset_minutes: i32,
}

/// `performance.memory`, Chromium only.
#[derive(Debug, Clone, PartialEq)]
pub struct HeapReading {
    pub used_bytes: f64,
    pub total_bytes: f64,
}

/// `navigator.getBattery()` result.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryReading {
    /// 0.0 ..= 1.0
    pub level: f64,
    pub charging: bool,
    /// Seconds; `Infinity` when unknown.
    pub charging_time: f64,
    pub discharging_time: f64,
}

/// `navigator.storage.estimate()` result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageReading {
    pub quota: Option<f64>,
    pub usage: Option<f64>,
}

/// Permissions the collector asks about, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionName {
    Camera,
    Microphone,
    Geolocation,
    Notifications,
    ClipboardRead,
    ClipboardWrite,
}

impl PermissionName {
    pub const ALL: [PermissionName; 6] = [
        PermissionName::Camera,
        PermissionName::Microphone,
        PermissionName::Geolocation,
        PermissionName::Notifications,
        PermissionName::ClipboardRead,
        PermissionName::ClipboardWrite,
    ];

    /// Name as the Permissions API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionName::Camera => "camera",
            PermissionName::Microphone => "microphone",
            PermissionName::Geolocation => "geolocation",
            PermissionName::Notifications => "notifications",
            PermissionName::ClipboardRead => "clipboard-read",
            PermissionName::ClipboardWrite => "clipboard-write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    Unsupported,
}

impl PermissionState {
    pub fn parse(state: &str) -> Self {
        match state {
            "granted" => PermissionState::Granted,
            "denied" => PermissionState::Denied,
            "prompt" => PermissionState::Prompt,
            _ => PermissionState::Unsupported,
        }
    }
}

/// `MediaDeviceInfo.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    VideoInput,
    AudioInput,
    AudioOutput,
    Other,
}

/// Oscillator settings for the audio probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub gain: f32,
}

/// WebGL unmasked renderer strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererInfo {
    pub vendor: Option<String>,
    pub renderer: Option<String>,
}

/// An offscreen 2d canvas. Dropping the handle releases the element.
pub trait Canvas2d {
    fn set_text_baseline(&mut self, baseline: &str) -> Result<()>;
    fn set_font(&mut self, font: &str) -> Result<()>;
    fn set_fill_style(&mut self, style: &str) -> Result<()>;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;
    fn to_data_url(&self) -> Result<String>;
}

/// A WebGL context on a throwaway canvas.
pub trait WebGlIntrospection {
    /// `Ok(None)` when `WEBGL_debug_renderer_info` is withheld.
    fn unmasked_renderer_info(&self) -> Result<Option<RendererInfo>>;
}

/// A live audio context. The owner must call [`AudioGraph::close`] exactly
/// once, whatever `render_tone` did.
#[async_trait(?Send)]
pub trait AudioGraph {
    /// Wire oscillator → analyser → gain → destination, start the
    /// oscillator, read the analyser's float frequency data once and stop.
    fn render_tone(&mut self, tone: &ToneSpec) -> Result<Vec<f32>>;

    async fn close(&mut self) -> Result<()>;
}

/// A peer connection gathering ICE candidates with no ICE servers
/// configured. The owner must call [`IceGatherer::close`].
#[async_trait(?Send)]
pub trait IceGatherer {
    /// Next candidate line, `None` once gathering completes.
    async fn next_candidate(&mut self) -> Option<String>;

    fn close(&mut self);
}

/// Everything the collector can ask of its host.
///
/// Synchronous methods mirror synchronous browser properties; async methods
/// mirror promise-returning APIs. Any method may fail; the collector maps
/// each failure to that field's fallback and carries on.
#[async_trait(?Send)]
pub trait HostEnvironment {
    fn navigator(&self) -> Result<NavigatorReading>;

    fn screen(&self) -> Result<ScreenReading>;

    fn timezone(&self) -> Result<TimezoneReading>;

    fn heap(&self) -> Result<Capability<HeapReading>>;

    fn plugins(&self) -> Result<Vec<String>>;

    /// `window.matchMedia(query).matches`.
    fn media_query(&self, query: &str) -> Result<bool>;

    fn canvas_2d(&self, width: u32, height: u32) -> Result<Capability<Box<dyn Canvas2d>>>;

    fn webgl(&self) -> Result<Capability<Box<dyn WebGlIntrospection>>>;

    fn audio_context(&self) -> Result<Capability<Box<dyn AudioGraph>>>;

    fn peer_connection(&self) -> Result<Capability<Box<dyn IceGatherer>>>;

    fn speech_voice_count(&self) -> Result<Capability<usize>>;

    async fn sleep(&self, duration: Duration);

    async fn battery(&self) -> Result<Capability<BatteryReading>>;

    async fn storage_estimate(&self) -> Result<Capability<StorageReading>>;

    async fn query_permission(&self, name: PermissionName) -> Result<PermissionState>;

    async fn media_devices(&self) -> Result<Capability<Vec<MediaKind>>>;

    /// One high-accuracy position fix. A refused permission is reported as
    /// [`crate::ProbeError::Blocked`].
    async fn current_position(&self) -> Result<Capability<GeoFix>>;
}
