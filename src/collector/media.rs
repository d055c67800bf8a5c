//! Media endpoint and speech voice counts.

use crate::host::{Capability, HostEnvironment, MediaKind};
use crate::snapshot::MediaDeviceCounts;

pub fn tally(kinds: &[MediaKind]) -> MediaDeviceCounts {
    let count = |kind: MediaKind| kinds.iter().filter(|k| **k == kind).count() as u32;
    MediaDeviceCounts {
        cameras: count(MediaKind::VideoInput),
        microphones: count(MediaKind::AudioInput),
        speakers: count(MediaKind::AudioOutput),
        speech_voices: 0,
    }
}

/// Device enumeration and voice counting are independent: a failed
/// enumeration zeroes the endpoint counts but still counts voices.
pub(crate) async fn media_counts<H: HostEnvironment + ?Sized>(host: &H) -> MediaDeviceCounts {
    let mut counts = match host.media_devices().await {
        Ok(Capability::Available(kinds)) => tally(&kinds),
        Ok(Capability::Unavailable) => MediaDeviceCounts::default(),
        Err(e) => {
            log::debug!("media device enumeration failed: {}", e);
            MediaDeviceCounts::default()
        }
    };

    counts.speech_voices = match host.speech_voice_count() {
        Ok(Capability::Available(n)) => n as u32,
        Ok(Capability::Unavailable) => 0,
        Err(e) => {
            log::debug!("speech voice probe failed: {}", e);
            0
        }
    };
    counts
}
