//! Fixed probe parameters.
//!
//! These are part of what makes a signature reproducible: changing any of
//! them changes the canvas signature, audio hash, and therefore the visitor
//! id. Callers cannot override them.

/// Fixed probe parameters.
pub struct ProbeConstants;

impl ProbeConstants {
    pub const CANVAS_WIDTH: u32 = 200;
    pub const CANVAS_HEIGHT: u32 = 50;
    pub const CANVAS_TEXT: &'static str = "SEEKER";
    pub const CANVAS_FONT: &'static str = "14px Arial";
    pub const CANVAS_BASELINE: &'static str = "top";
    pub const CANVAS_RECT_FILL: &'static str = "#f60";
    pub const CANVAS_RECT: (f64, f64, f64, f64) = (125.0, 1.0, 62.0, 20.0);
    pub const CANVAS_TEXT_FILL: &'static str = "#069";
    pub const CANVAS_TEXT_AT: (f64, f64) = (2.0, 15.0);
    pub const CANVAS_SHADOW_FILL: &'static str = "rgba(102, 204, 0, 0.7)";
    pub const CANVAS_SHADOW_AT: (f64, f64) = (4.0, 17.0);

    pub const OSCILLATOR_FREQUENCY_HZ: f32 = 10_000.0;
    pub const OSCILLATOR_GAIN: f32 = 0.0;

    /// How many trailing data-URI characters form the canvas signature.
    pub const CANVAS_SIGNATURE_LEN: usize = 32;
    /// How many leading frequency bins feed the audio hash.
    pub const AUDIO_BINS: usize = 10;
    /// Hard upper bound on ICE candidate gathering.
    pub const LOCAL_IP_TIMEOUT_MS: u64 = 500;
    /// How many plugin names are listed before the `+N more` suffix.
    pub const PLUGIN_PREVIEW_COUNT: usize = 3;

    pub const VISITOR_ID_SEPARATOR: &'static str = "###";

    pub const QUERY_DARK_MODE: &'static str = "(prefers-color-scheme: dark)";
    pub const QUERY_REDUCED_MOTION: &'static str = "(prefers-reduced-motion: reduce)";
    pub const QUERY_FORCED_COLORS: &'static str = "(forced-colors: active)";
}
