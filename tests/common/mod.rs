//! Scripted host for driving the collector natively.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use seeker_wasm::host::{
    AudioGraph, BatteryReading, Canvas2d, Capability, ConnectionReading, HeapReading,
    HostEnvironment, IceGatherer, MediaKind, NavigatorReading, PermissionName, PermissionState,
    RendererInfo, ScreenReading, StorageReading, TimezoneReading, ToneSpec, WebGlIntrospection,
};
use seeker_wasm::{GeoFix, ProbeError, Result};

pub const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const CANVAS_DATA_URL: &str =
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAMgAAAAyCAYAAAAZUZThAAAAAXNSR0IArs4c6QAAIABJREFUeF7t";

/// Side effects the collector had on the host.
#[derive(Default)]
pub struct Probes {
    pub audio_closed: Cell<u32>,
    pub peer_closed: Cell<u32>,
    pub sleeps: RefCell<Vec<Duration>>,
    pub canvas_calls: RefCell<Vec<String>>,
}

pub enum CanvasMode {
    Absent,
    Throws,
    Draws(String),
}

pub enum WebGlMode {
    Absent,
    Throws,
    Hidden,
    Exposes(RendererInfo),
}

pub enum AudioMode {
    Absent,
    Throws,
    Renders(Vec<f32>),
    /// Renders, then fails to close.
    CloseFails(Vec<f32>),
}

pub enum IceMode {
    Absent,
    /// Yields the candidates, then reports gathering complete.
    Completes(Vec<String>),
    /// Yields the candidates, then never completes.
    Stalls(Vec<String>),
}

pub enum PositionMode {
    Unsupported,
    Denied,
    Fails,
    Fix(GeoFix),
}

pub struct FakeHost {
    pub navigator: Option<NavigatorReading>,
    pub screen: Option<ScreenReading>,
    pub timezone: Option<TimezoneReading>,
    pub heap: Option<HeapReading>,
    pub plugins: Option<Vec<String>>,
    pub dark_mode: Option<bool>,
    pub canvas: CanvasMode,
    pub webgl: WebGlMode,
    pub audio: AudioMode,
    pub ice: IceMode,
    pub voices: Option<usize>,
    pub battery: Option<BatteryReading>,
    pub storage: Option<StorageReading>,
    pub permissions: Vec<(PermissionName, Result<PermissionState>)>,
    pub media: Option<Vec<MediaKind>>,
    pub position: PositionMode,
    pub probes: Rc<Probes>,
}

impl FakeHost {
    /// A current desktop Chrome with every API exposed.
    pub fn modern() -> Self {
        Self {
            navigator: Some(NavigatorReading {
                user_agent: CHROME_UA.into(),
                language: Some("en-US".into()),
                languages: vec!["en-US".into(), "en".into()],
                platform: Some("Win32".into()),
                hardware_concurrency: Some(8.0),
                device_memory: Some(8.0),
                max_touch_points: Some(0),
                online: true,
                cookies_enabled: true,
                do_not_track: None,
                pdf_viewer_enabled: Some(true),
                connection: Some(ConnectionReading {
                    effective_type: Some("4g".into()),
                    connection_type: None,
                    downlink: Some(10.0),
                }),
            }),
            screen: Some(ScreenReading {
                width: 1920,
                height: 1080,
                viewport_width: 1280.0,
                viewport_height: 720.0,
                pixel_ratio: 1.0,
                color_depth: 24,
                orientation: Some("landscape-primary".into()),
            }),
            timezone: Some(TimezoneReading {
                name: Some("Europe/Berlin".into()),
                offset_minutes: -60,
            }),
            heap: Some(HeapReading {
                used_bytes: 10.0 * 1024.0 * 1024.0,
                total_bytes: 20.0 * 1024.0 * 1024.0,
            }),
            plugins: Some(vec![
                "PDF Viewer".into(),
                "Chrome PDF Viewer".into(),
                "Chromium PDF Viewer".into(),
                "Microsoft Edge PDF Viewer".into(),
                "WebKit built-in PDF".into(),
            ]),
            dark_mode: Some(false),
            canvas: CanvasMode::Draws(CANVAS_DATA_URL.into()),
            webgl: WebGlMode::Exposes(RendererInfo {
                vendor: Some("Google Inc. (NVIDIA)".into()),
                renderer: Some("ANGLE (NVIDIA, NVIDIA GeForce RTX 3060 Direct3D11 vs_5_0 ps_5_0)".into()),
            }),
            audio: AudioMode::Renders(vec![-100.0; 1024]),
            ice: IceMode::Completes(vec![
                "candidate:842163049 1 udp 1677729535 192.168.1.23 54321 typ host generation 0".into(),
                "candidate:842163050 1 tcp 1518280447 192.168.1.23 9 typ host tcptype active".into(),
            ]),
            voices: Some(3),
            battery: Some(BatteryReading {
                level: 0.87,
                charging: true,
                charging_time: 2700.0,
                discharging_time: f64::INFINITY,
            }),
            storage: Some(StorageReading {
                quota: Some(10.0 * 1024.0 * 1024.0 * 1024.0),
                usage: Some(512.0 * 1024.0 * 1024.0),
            }),
            permissions: PermissionName::ALL
                .into_iter()
                .map(|name| (name, Ok(PermissionState::Prompt)))
                .collect(),
            media: Some(vec![MediaKind::VideoInput, MediaKind::AudioInput, MediaKind::AudioOutput]),
            position: PositionMode::Unsupported,
            probes: Rc::new(Probes::default()),
        }
    }

    /// A host with every optional API removed.
    pub fn bare() -> Self {
        Self {
            navigator: Some(NavigatorReading {
                user_agent: CHROME_UA.into(),
                ..NavigatorReading::default()
            }),
            heap: None,
            plugins: None,
            dark_mode: None,
            canvas: CanvasMode::Absent,
            webgl: WebGlMode::Absent,
            audio: AudioMode::Absent,
            ice: IceMode::Absent,
            voices: None,
            battery: None,
            storage: None,
            permissions: Vec::new(),
            media: None,
            ..Self::modern()
        }
    }
}

struct FakeCanvas {
    data_url: String,
    probes: Rc<Probes>,
}

impl FakeCanvas {
    fn record(&self, call: String) -> Result<()> {
        self.probes.canvas_calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Canvas2d for FakeCanvas {
    fn set_text_baseline(&mut self, baseline: &str) -> Result<()> {
        self.record(format!("textBaseline={}", baseline))
    }

    fn set_font(&mut self, font: &str) -> Result<()> {
        self.record(format!("font={}", font))
    }

    fn set_fill_style(&mut self, style: &str) -> Result<()> {
        self.record(format!("fillStyle={}", style))
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.record(format!("fillRect({},{},{},{})", x, y, width, height))
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.record(format!("fillText({},{},{})", text, x, y))
    }

    fn to_data_url(&self) -> Result<String> {
        Ok(self.data_url.clone())
    }
}

struct FakeWebGl(Option<RendererInfo>);

impl WebGlIntrospection for FakeWebGl {
    fn unmasked_renderer_info(&self) -> Result<Option<RendererInfo>> {
        Ok(self.0.clone())
    }
}

struct FakeAudio {
    bins: Option<Vec<f32>>,
    close_fails: bool,
    probes: Rc<Probes>,
}

#[async_trait(?Send)]
impl AudioGraph for FakeAudio {
    fn render_tone(&mut self, _tone: &ToneSpec) -> Result<Vec<f32>> {
        self.bins
            .clone()
            .ok_or_else(|| ProbeError::Js("createOscillator is not a function".into()))
    }

    async fn close(&mut self) -> Result<()> {
        self.probes.audio_closed.set(self.probes.audio_closed.get() + 1);
        if self.close_fails {
            Err(ProbeError::Js("InvalidStateError".into()))
        } else {
            Ok(())
        }
    }
}

struct FakeGatherer {
    candidates: VecDeque<String>,
    completes: bool,
    probes: Rc<Probes>,
}

#[async_trait(?Send)]
impl IceGatherer for FakeGatherer {
    async fn next_candidate(&mut self) -> Option<String> {
        if let Some(candidate) = self.candidates.pop_front() {
            return Some(candidate);
        }
        if !self.completes {
            futures::future::pending::<()>().await;
        }
        None
    }

    fn close(&mut self) {
        self.probes.peer_closed.set(self.probes.peer_closed.get() + 1);
    }
}

#[async_trait(?Send)]
impl HostEnvironment for FakeHost {
    fn navigator(&self) -> Result<NavigatorReading> {
        self.navigator
            .clone()
            .ok_or_else(|| ProbeError::Blocked("navigator".into()))
    }

    fn screen(&self) -> Result<ScreenReading> {
        self.screen.clone().ok_or_else(|| ProbeError::Blocked("screen".into()))
    }

    fn timezone(&self) -> Result<TimezoneReading> {
        self.timezone
            .clone()
            .ok_or_else(|| ProbeError::Js("Intl is not defined".into()))
    }

    fn heap(&self) -> Result<Capability<HeapReading>> {
        Ok(Capability::from_option(self.heap.clone()))
    }

    fn plugins(&self) -> Result<Vec<String>> {
        self.plugins
            .clone()
            .ok_or_else(|| ProbeError::Blocked("navigator.plugins".into()))
    }

    fn media_query(&self, query: &str) -> Result<bool> {
        let dark = self
            .dark_mode
            .ok_or_else(|| ProbeError::Unavailable("matchMedia".into()))?;
        Ok(query.contains("dark") && dark)
    }

    fn canvas_2d(&self, _width: u32, _height: u32) -> Result<Capability<Box<dyn Canvas2d>>> {
        match &self.canvas {
            CanvasMode::Absent => Ok(Capability::Unavailable),
            CanvasMode::Throws => Err(ProbeError::Js("SecurityError".into())),
            CanvasMode::Draws(url) => Ok(Capability::Available(Box::new(FakeCanvas {
                data_url: url.clone(),
                probes: self.probes.clone(),
            }))),
        }
    }

    fn webgl(&self) -> Result<Capability<Box<dyn WebGlIntrospection>>> {
        match &self.webgl {
            WebGlMode::Absent => Ok(Capability::Unavailable),
            WebGlMode::Throws => Err(ProbeError::Js("context lost".into())),
            WebGlMode::Hidden => Ok(Capability::Available(Box::new(FakeWebGl(None)))),
            WebGlMode::Exposes(info) => Ok(Capability::Available(Box::new(FakeWebGl(Some(info.clone()))))),
        }
    }

    fn audio_context(&self) -> Result<Capability<Box<dyn AudioGraph>>> {
        let (bins, close_fails) = match &self.audio {
            AudioMode::Absent => return Ok(Capability::Unavailable),
            AudioMode::Throws => (None, false),
            AudioMode::Renders(bins) => (Some(bins.clone()), false),
            AudioMode::CloseFails(bins) => (Some(bins.clone()), true),
        };
        Ok(Capability::Available(Box::new(FakeAudio {
            bins,
            close_fails,
            probes: self.probes.clone(),
        })))
    }

    fn peer_connection(&self) -> Result<Capability<Box<dyn IceGatherer>>> {
        let (candidates, completes) = match &self.ice {
            IceMode::Absent => return Ok(Capability::Unavailable),
            IceMode::Completes(c) => (c.clone(), true),
            IceMode::Stalls(c) => (c.clone(), false),
        };
        Ok(Capability::Available(Box::new(FakeGatherer {
            candidates: candidates.into(),
            completes,
            probes: self.probes.clone(),
        })))
    }

    fn speech_voice_count(&self) -> Result<Capability<usize>> {
        Ok(Capability::from_option(self.voices))
    }

    async fn sleep(&self, duration: Duration) {
        // Time passes instantly.
        self.probes.sleeps.borrow_mut().push(duration);
    }

    async fn battery(&self) -> Result<Capability<BatteryReading>> {
        Ok(Capability::from_option(self.battery.clone()))
    }

    async fn storage_estimate(&self) -> Result<Capability<StorageReading>> {
        Ok(Capability::from_option(self.storage.clone()))
    }

    async fn query_permission(&self, name: PermissionName) -> Result<PermissionState> {
        match self.permissions.iter().find(|(n, _)| *n == name) {
            Some((_, Ok(state))) => Ok(*state),
            Some((_, Err(e))) => Err(e.clone()),
            None => Err(ProbeError::Unavailable("navigator.permissions".into())),
        }
    }

    async fn media_devices(&self) -> Result<Capability<Vec<MediaKind>>> {
        Ok(Capability::from_option(self.media.clone()))
    }

    async fn current_position(&self) -> Result<Capability<GeoFix>> {
        match &self.position {
            PositionMode::Unsupported => Ok(Capability::Unavailable),
            PositionMode::Denied => Err(ProbeError::Blocked("User denied Geolocation".into())),
            PositionMode::Fails => Err(ProbeError::Js("Position acquisition timed out".into())),
            PositionMode::Fix(fix) => Ok(Capability::Available(fix.clone())),
        }
    }
}
