//! Web Audio graph for the oscillator probe.

use async_trait::async_trait;
use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, OscillatorType};

use super::js_helpers;
use crate::error::Result;
use crate::host::{AudioGraph, Capability, ToneSpec};

pub struct BrowserAudioGraph {
    ctx: AudioContext,
}

impl BrowserAudioGraph {
    /// Construct through whichever of `AudioContext` / `webkitAudioContext`
    /// the page exposes.
    pub fn open() -> Result<Capability<Self>> {
        let Capability::Available(ctor) =
            js_helpers::resolve_constructor(&["AudioContext", "webkitAudioContext"])
        else {
            return Ok(Capability::Unavailable);
        };
        let ctx = Reflect::construct(&ctor, &Array::new())?;
        Ok(Capability::Available(Self {
            ctx: ctx.unchecked_into(),
        }))
    }
}

#[async_trait(?Send)]
impl AudioGraph for BrowserAudioGraph {
    fn render_tone(&mut self, tone: &ToneSpec) -> Result<Vec<f32>> {
        let now = self.ctx.current_time();
        let oscillator = self.ctx.create_oscillator()?;
        let analyser = self.ctx.create_analyser()?;
        let gain = self.ctx.create_gain()?;

        oscillator.set_type(OscillatorType::Triangle);
        oscillator.frequency().set_value_at_time(tone.frequency_hz, now)?;
        gain.gain().set_value_at_time(tone.gain, now)?;

        oscillator.connect_with_audio_node(&analyser)?;
        analyser.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&self.ctx.destination())?;

        oscillator.start()?;
        let mut bins = vec![0f32; analyser.frequency_bin_count() as usize];
        analyser.get_float_frequency_data(&mut bins);
        oscillator.stop()?;

        Ok(bins)
    }

    async fn close(&mut self) -> Result<()> {
        JsFuture::from(self.ctx.close()?).await?;
        Ok(())
    }
}
