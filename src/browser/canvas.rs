//! Offscreen 2d canvas and WebGL context handles.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, WebGlRenderingContext};

use super::js_helpers;
use crate::error::{ProbeError, Result};
use crate::host::{Canvas2d, Capability, RendererInfo, WebGlIntrospection};

/// `WEBGL_debug_renderer_info` enum values, used when the extension object
/// does not carry its own constants.
const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ProbeError::Blocked("created element is not a canvas".into()))
}

pub struct BrowserCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl BrowserCanvas {
    pub fn open(document: &Document, width: u32, height: u32) -> Result<Capability<Self>> {
        let element = create_canvas(document)?;
        element.set_width(width);
        element.set_height(height);

        let Some(ctx) = element.get_context("2d")? else {
            return Ok(Capability::Unavailable);
        };
        let ctx = ctx
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ProbeError::Blocked("2d context has an unexpected type".into()))?;

        Ok(Capability::Available(Self { element, ctx }))
    }
}

impl Canvas2d for BrowserCanvas {
    fn set_text_baseline(&mut self, baseline: &str) -> Result<()> {
        self.ctx.set_text_baseline(baseline);
        Ok(())
    }

    fn set_font(&mut self, font: &str) -> Result<()> {
        self.ctx.set_font(font);
        Ok(())
    }

    fn set_fill_style(&mut self, style: &str) -> Result<()> {
        // Set by name: the typed setter's signature differs across web-sys releases.
        js_sys::Reflect::set(&self.ctx, &JsValue::from_str("fillStyle"), &JsValue::from_str(style))?;
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.ctx.fill_rect(x, y, width, height);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        Ok(self.ctx.fill_text(text, x, y)?)
    }

    fn to_data_url(&self) -> Result<String> {
        Ok(self.element.to_data_url()?)
    }
}

pub struct BrowserWebGl {
    // Keeps the element alive for as long as the context is used.
    _element: HtmlCanvasElement,
    gl: WebGlRenderingContext,
}

impl BrowserWebGl {
    /// Tries `webgl`, then `experimental-webgl`.
    pub fn open(document: &Document) -> Result<Capability<Self>> {
        let element = create_canvas(document)?;

        let ctx = match element.get_context("webgl")? {
            Some(ctx) => Some(ctx),
            None => element.get_context("experimental-webgl")?,
        };
        let Some(ctx) = ctx else {
            return Ok(Capability::Unavailable);
        };

        Ok(Capability::Available(Self {
            _element: element,
            gl: ctx.unchecked_into::<WebGlRenderingContext>(),
        }))
    }

    fn parameter(&self, ext: &JsValue, name: &str, fallback: u32) -> Result<Option<String>> {
        let pname = js_helpers::f64_of(ext, name).map(|v| v as u32).unwrap_or(fallback);
        Ok(self.gl.get_parameter(pname)?.as_string())
    }
}

impl WebGlIntrospection for BrowserWebGl {
    fn unmasked_renderer_info(&self) -> Result<Option<RendererInfo>> {
        let Some(ext) = self.gl.get_extension("WEBGL_debug_renderer_info")? else {
            return Ok(None);
        };
        let ext: JsValue = ext.into();

        Ok(Some(RendererInfo {
            vendor: self.parameter(&ext, "UNMASKED_VENDOR_WEBGL", UNMASKED_VENDOR_WEBGL)?,
            renderer: self.parameter(&ext, "UNMASKED_RENDERER_WEBGL", UNMASKED_RENDERER_WEBGL)?,
        }))
    }
}
