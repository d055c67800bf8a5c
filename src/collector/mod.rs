//! Device signal collection.
//!
//! [`DeviceSignalCollector::collect`] runs every probe against its host and
//! merges the results into one [`DeviceSnapshot`]:
//!
//! ```text
//! sync:   navigator · screen · timezone · heap · plugins · media queries
//!         canvas · webgl
//! async:  local IPs ┐
//!         battery   │
//!         storage   ├─ joined, all settle before the merge
//!         permissions
//!         media     │
//!         audio     ┘
//! merge:  DeviceSnapshot + visitor id
//! ```
//!
//! No probe can fail the run. Each one isolates its own errors and degrades
//! to a fallback for its fields only.

use std::time::Duration;

use crate::config::ProbeConstants;
use crate::host::HostEnvironment;
use crate::snapshot::{DeviceSnapshot, SnapshotParts};

pub mod audio;
pub mod canvas;
pub mod environment;
pub mod local_ips;
pub mod media;
pub mod permissions;
pub mod power;
pub mod webgl;

/// Collects [`DeviceSnapshot`]s from a host environment.
///
/// Takes no parameters beyond the host and holds no state between runs;
/// every `collect()` allocates and releases its own canvas, audio context
/// and peer connection.
pub struct DeviceSignalCollector<H: HostEnvironment> {
    host: H,
}

impl<H: HostEnvironment> DeviceSignalCollector<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Run every probe and assemble a fresh snapshot. Never fails.
    pub async fn collect(&self) -> DeviceSnapshot {
        log::info!("Collecting device snapshot");
        let host = &self.host;

        let navigator = environment::settle("navigator", host.navigator());
        let screen = environment::settle("screen", host.screen());
        let timezone = environment::settle("timezone", host.timezone());

        let identity = environment::browser_identity(navigator.as_ref());
        let screen_profile = environment::screen_profile(screen.as_ref(), navigator.as_ref());
        let (heap_used, heap_total) = environment::heap_usage(host);
        let hardware = environment::hardware_profile(navigator.as_ref(), heap_used, heap_total);
        let plugins = environment::plugin_summary(host, ProbeConstants::PLUGIN_PREVIEW_COUNT);
        let preferences = environment::preferences(host);
        let canvas = canvas::canvas_signature(host, ProbeConstants::CANVAS_SIGNATURE_LEN);
        let (webgl_vendor, webgl_renderer) = webgl::renderer_strings(host);

        let ip_timeout = Duration::from_millis(ProbeConstants::LOCAL_IP_TIMEOUT_MS);
        let (local_ips, battery, storage, permissions, media, audio) = futures::join!(
            local_ips::discover_local_ips(host, ip_timeout),
            power::battery_info(host),
            power::storage_info(host),
            permissions::probe_permissions(host),
            media::media_counts(host),
            audio::audio_hash(host, ProbeConstants::AUDIO_BINS),
        );

        let network = environment::network_profile(navigator.as_ref(), timezone.as_ref(), local_ips);

        let snapshot = DeviceSnapshot::assemble(SnapshotParts {
            identity,
            screen: screen_profile,
            network,
            hardware,
            canvas,
            audio,
            webgl_vendor,
            webgl_renderer,
            plugins,
            battery,
            storage,
            permissions,
            preferences,
            media,
        });

        log::info!(
            "Device snapshot collected: visitor {} ({} local address(es))",
            snapshot.visitor_id(),
            snapshot.network().local_ips.len()
        );
        snapshot
    }
}
