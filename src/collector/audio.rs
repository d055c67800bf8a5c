//! Audio fingerprint.
//!
//! A silent 10 kHz triangle wave through an analyser. The resulting
//! frequency bins depend on the platform's audio stack and float math.

use crate::config::ProbeConstants;
use crate::format::to_fixed;
use crate::host::{Capability, HostEnvironment, ToneSpec};

/// Sum of magnitudes over the first `bins` frequency bins, 6 dp.
pub fn summarize_bins(buffer: &[f32], bins: usize) -> String {
    let sum: f64 = buffer.iter().take(bins).map(|v| f64::from(*v).abs()).sum();
    to_fixed(sum, 6)
}

pub(crate) async fn audio_hash<H: HostEnvironment + ?Sized>(host: &H, bins: usize) -> String {
    let mut graph = match host.audio_context() {
        Ok(Capability::Available(graph)) => graph,
        Ok(Capability::Unavailable) => return "unavailable".into(),
        Err(e) => {
            log::debug!("audio probe degraded: {}", e);
            return e.sentinel().into();
        }
    };

    let tone = ToneSpec {
        frequency_hz: ProbeConstants::OSCILLATOR_FREQUENCY_HZ,
        gain: ProbeConstants::OSCILLATOR_GAIN,
    };
    let rendered = graph.render_tone(&tone);
    // Released on every path, before the result is looked at.
    let closed = graph.close().await;

    match (rendered, closed) {
        (Ok(buffer), Ok(())) => summarize_bins(&buffer, bins),
        (Err(e), _) => {
            log::debug!("audio probe blocked: {}", e);
            "blocked".into()
        }
        (Ok(_), Err(e)) => {
            log::warn!("Failed to close audio context: {}", e);
            "blocked".into()
        }
    }
}
