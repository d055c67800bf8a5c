//! Canvas fingerprint.
//!
//! Text rasterization differs subtly between GPU, driver, font stack and
//! anti-aliasing settings; the tail of the PNG data URI captures that.

use crate::config::ProbeConstants;
use crate::error::Result;
use crate::host::{Canvas2d, Capability, HostEnvironment};

/// Paint the fixed scene. The exact calls and their order are part of the
/// signature.
fn paint(canvas: &mut dyn Canvas2d) -> Result<()> {
    let (x, y, w, h) = ProbeConstants::CANVAS_RECT;
    let (text_x, text_y) = ProbeConstants::CANVAS_TEXT_AT;
    let (shadow_x, shadow_y) = ProbeConstants::CANVAS_SHADOW_AT;

    canvas.set_text_baseline(ProbeConstants::CANVAS_BASELINE)?;
    canvas.set_font(ProbeConstants::CANVAS_FONT)?;
    canvas.set_fill_style(ProbeConstants::CANVAS_RECT_FILL)?;
    canvas.fill_rect(x, y, w, h)?;
    canvas.set_fill_style(ProbeConstants::CANVAS_TEXT_FILL)?;
    canvas.fill_text(ProbeConstants::CANVAS_TEXT, text_x, text_y)?;
    canvas.set_fill_style(ProbeConstants::CANVAS_SHADOW_FILL)?;
    canvas.fill_text(ProbeConstants::CANVAS_TEXT, shadow_x, shadow_y)?;
    Ok(())
}

/// Last `len` characters of the data URI.
pub fn signature_tail(data_url: &str, len: usize) -> String {
    let total = data_url.chars().count();
    data_url.chars().skip(total.saturating_sub(len)).collect()
}

pub(crate) fn canvas_signature<H: HostEnvironment + ?Sized>(host: &H, len: usize) -> String {
    let mut canvas = match host.canvas_2d(ProbeConstants::CANVAS_WIDTH, ProbeConstants::CANVAS_HEIGHT) {
        Ok(Capability::Available(canvas)) => canvas,
        Ok(Capability::Unavailable) => return "unavailable".into(),
        Err(e) => {
            log::debug!("canvas probe degraded: {}", e);
            return e.sentinel().into();
        }
    };

    let signature = paint(canvas.as_mut()).and_then(|_| canvas.to_data_url());
    match signature {
        Ok(url) => signature_tail(&url, len),
        Err(e) => {
            log::debug!("canvas probe blocked: {}", e);
            "blocked".into()
        }
    }
}
