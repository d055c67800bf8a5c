//! Browser implementation of [`HostEnvironment`].
//!
//! Typed `web-sys` bindings are used where the API is standard and stable;
//! optional, prefixed or Chromium-only properties are read by name through
//! [`js_helpers`].

use std::time::Duration;

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::error::{ProbeError, Result};
use crate::host::{
    AudioGraph, BatteryReading, Canvas2d, Capability, ConnectionReading, HeapReading,
    HostEnvironment, IceGatherer, MediaKind, NavigatorReading, PermissionName, PermissionState,
    ScreenReading, StorageReading, TimezoneReading, WebGlIntrospection,
};
use crate::location::GeoFix;

pub mod audio;
pub mod canvas;
pub mod geolocation;
pub mod js_helpers;
pub mod rtc;

use audio::BrowserAudioGraph;
use canvas::{BrowserCanvas, BrowserWebGl};
use js_helpers::{array_like, bool_of, call_method, f64_of, first_prop_of, prop_of, settle_promise, string_of};
use rtc::BrowserIceGatherer;

/// The page's `window`, as a host.
pub struct BrowserHost {
    window: Window,
}

impl BrowserHost {
    pub fn new() -> Result<Self> {
        web_sys::window()
            .map(|window| Self { window })
            .ok_or_else(|| ProbeError::Unavailable("no window in this context".into()))
    }

    fn navigator_value(&self) -> JsValue {
        self.window.navigator().into()
    }

    fn document(&self) -> Result<Document> {
        self.window
            .document()
            .ok_or_else(|| ProbeError::Unavailable("no document".into()))
    }
}

fn connection_reading(navigator: &JsValue) -> Option<ConnectionReading> {
    let connection = first_prop_of(navigator, &["connection", "mozConnection", "webkitConnection"])?;
    Some(ConnectionReading {
        effective_type: string_of(&connection, "effectiveType"),
        connection_type: string_of(&connection, "type"),
        downlink: f64_of(&connection, "downlink"),
    })
}

fn media_kind(kind: &str) -> MediaKind {
    match kind {
        "videoinput" => MediaKind::VideoInput,
        "audioinput" => MediaKind::AudioInput,
        "audiooutput" => MediaKind::AudioOutput,
        _ => MediaKind::Other,
    }
}

#[async_trait(?Send)]
impl HostEnvironment for BrowserHost {
    fn navigator(&self) -> Result<NavigatorReading> {
        let navigator = self.window.navigator();
        let raw = self.navigator_value();

        let languages = prop_of(&raw, "languages")
            .map(|list| array_like(&list))
            .transpose()?
            .unwrap_or_default()
            .into_iter()
            .filter_map(|lang| lang.as_string())
            .collect();

        Ok(NavigatorReading {
            user_agent: navigator.user_agent()?,
            language: navigator.language(),
            languages,
            platform: navigator.platform().ok(),
            hardware_concurrency: f64_of(&raw, "hardwareConcurrency"),
            device_memory: f64_of(&raw, "deviceMemory"),
            max_touch_points: f64_of(&raw, "maxTouchPoints").map(|n| n as u32),
            online: navigator.on_line(),
            cookies_enabled: bool_of(&raw, "cookieEnabled").unwrap_or(false),
            do_not_track: string_of(&raw, "doNotTrack"),
            pdf_viewer_enabled: bool_of(&raw, "pdfViewerEnabled"),
            connection: connection_reading(&raw),
        })
    }

    fn screen(&self) -> Result<ScreenReading> {
        let screen = self.window.screen()?;
        let orientation = prop_of(&screen, "orientation").and_then(|o| string_of(&o, "type"));

        Ok(ScreenReading {
            width: screen.width()?,
            height: screen.height()?,
            viewport_width: self.window.inner_width()?.as_f64().unwrap_or(0.0),
            viewport_height: self.window.inner_height()?.as_f64().unwrap_or(0.0),
            pixel_ratio: self.window.device_pixel_ratio(),
            color_depth: screen.color_depth()?.max(0) as u32,
            orientation,
        })
    }

    fn timezone(&self) -> Result<TimezoneReading> {
        let offset_minutes = js_sys::Date::new_0().get_timezone_offset() as i32;
        let name = match js_helpers::get_global("Intl").and_then(|intl| prop_of(&intl, "DateTimeFormat")) {
            Some(ctor) => {
                let format = Reflect::construct(ctor.unchecked_ref::<js_sys::Function>(), &Array::new())?;
                let options = call_method(&format, "resolvedOptions", &Array::new())?;
                string_of(&options, "timeZone")
            }
            None => None,
        };

        Ok(TimezoneReading { name, offset_minutes })
    }

    fn heap(&self) -> Result<Capability<HeapReading>> {
        let memory = self
            .window
            .performance()
            .and_then(|performance| prop_of(&performance, "memory"));
        let Some(memory) = memory else {
            return Ok(Capability::Unavailable);
        };

        match (f64_of(&memory, "usedJSHeapSize"), f64_of(&memory, "totalJSHeapSize")) {
            (Some(used_bytes), Some(total_bytes)) => Ok(Capability::Available(HeapReading {
                used_bytes,
                total_bytes,
            })),
            _ => Ok(Capability::Unavailable),
        }
    }

    fn plugins(&self) -> Result<Vec<String>> {
        let plugins = prop_of(&self.navigator_value(), "plugins")
            .ok_or_else(|| ProbeError::Blocked("navigator.plugins is not readable".into()))?;

        Ok(array_like(&plugins)?
            .iter()
            .filter_map(|plugin| string_of(plugin, "name"))
            .collect())
    }

    fn media_query(&self, query: &str) -> Result<bool> {
        self.window
            .match_media(query)?
            .map(|list| list.matches())
            .ok_or_else(|| ProbeError::Unavailable("matchMedia returned null".into()))
    }

    fn canvas_2d(&self, width: u32, height: u32) -> Result<Capability<Box<dyn Canvas2d>>> {
        let canvas = BrowserCanvas::open(&self.document()?, width, height)?;
        Ok(canvas.map(|c| Box::new(c) as Box<dyn Canvas2d>))
    }

    fn webgl(&self) -> Result<Capability<Box<dyn WebGlIntrospection>>> {
        let gl = BrowserWebGl::open(&self.document()?)?;
        Ok(gl.map(|g| Box::new(g) as Box<dyn WebGlIntrospection>))
    }

    fn audio_context(&self) -> Result<Capability<Box<dyn AudioGraph>>> {
        Ok(BrowserAudioGraph::open()?.map(|a| Box::new(a) as Box<dyn AudioGraph>))
    }

    fn peer_connection(&self) -> Result<Capability<Box<dyn IceGatherer>>> {
        Ok(BrowserIceGatherer::open()?.map(|g| Box::new(g) as Box<dyn IceGatherer>))
    }

    fn speech_voice_count(&self) -> Result<Capability<usize>> {
        let Some(synthesis) = prop_of(&self.window, "speechSynthesis") else {
            return Ok(Capability::Unavailable);
        };
        let voices = call_method(&synthesis, "getVoices", &Array::new())?;
        Ok(Capability::Available(array_like(&voices)?.len()))
    }

    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis().min(u128::from(u32::MAX)) as u32).await;
    }

    async fn battery(&self) -> Result<Capability<BatteryReading>> {
        let navigator = self.navigator_value();
        if prop_of(&navigator, "getBattery").is_none() {
            return Ok(Capability::Unavailable);
        }
        let manager = settle_promise(call_method(&navigator, "getBattery", &Array::new())?).await?;

        Ok(Capability::Available(BatteryReading {
            level: f64_of(&manager, "level").unwrap_or(0.0),
            charging: bool_of(&manager, "charging").unwrap_or(false),
            charging_time: f64_of(&manager, "chargingTime").unwrap_or(f64::INFINITY),
            discharging_time: f64_of(&manager, "dischargingTime").unwrap_or(f64::INFINITY),
        }))
    }

    async fn storage_estimate(&self) -> Result<Capability<StorageReading>> {
        let Some(storage) = prop_of(&self.navigator_value(), "storage") else {
            return Ok(Capability::Unavailable);
        };
        if prop_of(&storage, "estimate").is_none() {
            return Ok(Capability::Unavailable);
        }
        let estimate = settle_promise(call_method(&storage, "estimate", &Array::new())?).await?;

        Ok(Capability::Available(StorageReading {
            quota: f64_of(&estimate, "quota"),
            usage: f64_of(&estimate, "usage"),
        }))
    }

    async fn query_permission(&self, name: PermissionName) -> Result<PermissionState> {
        let permissions = prop_of(&self.navigator_value(), "permissions")
            .ok_or_else(|| ProbeError::Unavailable("navigator.permissions".into()))?;

        let descriptor = Object::new();
        Reflect::set(&descriptor, &JsValue::from_str("name"), &JsValue::from_str(name.as_str()))?;
        let args = Array::of1(&descriptor);
        let status = settle_promise(call_method(&permissions, "query", &args)?).await?;

        Ok(string_of(&status, "state")
            .map(|state| PermissionState::parse(&state))
            .unwrap_or(PermissionState::Unsupported))
    }

    async fn media_devices(&self) -> Result<Capability<Vec<MediaKind>>> {
        let Some(devices) = prop_of(&self.navigator_value(), "mediaDevices") else {
            return Ok(Capability::Unavailable);
        };
        let list = settle_promise(call_method(&devices, "enumerateDevices", &Array::new())?).await?;

        Ok(Capability::Available(
            array_like(&list)?
                .iter()
                .map(|device| media_kind(&string_of(device, "kind").unwrap_or_default()))
                .collect(),
        ))
    }

    async fn current_position(&self) -> Result<Capability<GeoFix>> {
        geolocation::current_position(&self.navigator_value()).await
    }
}
