//! Unmasked GPU vendor / renderer.

use crate::error::ProbeError;
use crate::host::{Capability, HostEnvironment, RendererInfo};

fn non_empty(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "unknown".into())
}

/// `(vendor, renderer)`; `"hidden"` when the debug extension is withheld,
/// `"unavailable"` without WebGL, `"blocked"` when the context throws.
pub(crate) fn renderer_strings<H: HostEnvironment + ?Sized>(host: &H) -> (String, String) {
    let both = |s: &str| (s.to_string(), s.to_string());

    let gl = match host.webgl() {
        Ok(Capability::Available(gl)) => gl,
        Ok(Capability::Unavailable) => return both("unavailable"),
        Err(e) => {
            log::debug!("webgl probe degraded: {}", e);
            return both(e.sentinel());
        }
    };

    match gl.unmasked_renderer_info() {
        Ok(Some(RendererInfo { vendor, renderer })) => (non_empty(vendor), non_empty(renderer)),
        Ok(None) => {
            let withheld = ProbeError::Hidden("WEBGL_debug_renderer_info withheld".into());
            log::debug!("webgl probe degraded: {}", withheld);
            both(withheld.sentinel())
        }
        Err(e) => {
            log::debug!("webgl renderer info blocked: {}", e);
            both("blocked")
        }
    }
}
