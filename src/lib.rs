//! # Seeker WASM
//!
//! Client-side device signal collection compiled to WebAssembly.
//!
//! One call gathers identity, display, network, hardware and fingerprint
//! signals from the page's browser APIs and returns them as a single
//! [`DeviceSnapshot`], including a deterministic visitor id.
//!
//! ## Architecture
//!
//! ```text
//! collect_device_snapshot() (JS)
//!   ↓
//! DeviceSignalCollector        probes, fallbacks, merge
//!   ↓
//! HostEnvironment (trait)      BrowserHost in a page, fakes in tests
//!   ↓
//! web-sys / js-sys
//! ```
//!
//! ## Guarantees
//!
//! - **Never fails**: a missing, blocked or throwing API degrades only its
//!   own fields to a sentinel (`unavailable`, `blocked`, `hidden`, ...)
//! - **Bounded**: local address discovery gives up after 500 ms
//! - **Self-cleaning**: audio contexts and peer connections are closed on
//!   every path

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod browser;
pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod location;
pub mod snapshot;
pub mod user_agent;
pub mod visitor_id;

pub use browser::BrowserHost;
pub use collector::DeviceSignalCollector;
pub use config::ProbeConstants;
pub use error::{ErrorCode, ProbeError, Result};
pub use host::{Capability, HostEnvironment};
pub use location::{GeoFix, GeoOutcome};
pub use snapshot::DeviceSnapshot;
pub use visitor_id::VisitorIdInputs;

/// Initialize logging.
#[wasm_bindgen(start)]
pub fn init() {
    // A second init (e.g. module re-instantiated) leaves the first logger in place.
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Seeker WASM initialized");
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    // Plain objects rather than ES Maps, so JSON.stringify works on the result.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| ProbeError::from(e).into())
}

/// Collect a fresh device snapshot.
///
/// Rejects only if no `window` is reachable (e.g. in a worker).
#[wasm_bindgen]
pub async fn collect_device_snapshot() -> std::result::Result<JsValue, JsValue> {
    let host = BrowserHost::new()?;
    let snapshot = DeviceSignalCollector::new(host).collect().await;
    to_js(&snapshot)
}

/// Ask for one position fix and describe it.
#[wasm_bindgen]
pub async fn locate_device() -> std::result::Result<JsValue, JsValue> {
    let host = BrowserHost::new()?;
    to_js(&location::locate(&host).await)
}

/// The visitor id for an explicit set of inputs. Missing cores or memory
/// render as empty fields.
#[wasm_bindgen]
pub fn visitor_id(
    user_agent: String,
    language: String,
    color_depth: u32,
    timezone_offset_minutes: i32,
    canvas_signature: String,
    hardware_concurrency: Option<u32>,
    device_memory: Option<f64>,
) -> String {
    VisitorIdInputs {
        user_agent,
        language,
        color_depth,
        timezone_offset_minutes,
        canvas_signature,
        hardware_concurrency,
        device_memory,
    }
    .visitor_id()
}
