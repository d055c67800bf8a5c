//! Composite visitor id.
//!
//! 32-bit FNV-1a over the UTF-16 code units of the joined inputs, so the
//! same environment hashes to the same id whether it is computed here or by
//! a page script iterating `charCodeAt`.

use serde::{Deserialize, Serialize};

use crate::config::ProbeConstants;
use crate::format::js_number;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// The signals a visitor id is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorIdInputs {
    pub user_agent: String,
    pub language: String,
    pub color_depth: u32,
    /// `Date.getTimezoneOffset()`: minutes behind UTC.
    pub timezone_offset_minutes: i32,
    pub canvas_signature: String,
    /// `navigator.hardwareConcurrency` as reported; `None` renders as an
    /// empty field.
    pub hardware_concurrency: Option<u32>,
    /// `navigator.deviceMemory` in GB; `None` renders as an empty field.
    pub device_memory: Option<f64>,
}

impl VisitorIdInputs {
    /// The `###`-joined string that gets hashed.
    pub fn joined(&self) -> String {
        let fields = [
            self.user_agent.clone(),
            self.language.clone(),
            self.color_depth.to_string(),
            self.timezone_offset_minutes.to_string(),
            self.canvas_signature.clone(),
            self.hardware_concurrency.map(|c| c.to_string()).unwrap_or_default(),
            self.device_memory.map(js_number).unwrap_or_default(),
        ];
        fields.join(ProbeConstants::VISITOR_ID_SEPARATOR)
    }

    pub fn visitor_id(&self) -> String {
        render_hex(fnv1a_utf16(&self.joined()))
    }
}

/// FNV-1a over UTF-16 code units.
pub fn fnv1a_utf16(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// 8 uppercase hex digits, zero padded.
pub fn render_hex(hash: u32) -> String {
    format!("{:08X}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> VisitorIdInputs {
        VisitorIdInputs {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0"
                .into(),
            language: "en-US".into(),
            color_depth: 24,
            timezone_offset_minutes: -60,
            canvas_signature: "AAAAAElFTkSuQmCC".into(),
            hardware_concurrency: Some(8),
            device_memory: Some(8.0),
        }
    }

    #[test]
    fn test_known_fnv_vectors() {
        assert_eq!(fnv1a_utf16(""), 0x811c9dc5);
        assert_eq!(fnv1a_utf16("a"), 0xe40c292c);
        assert_eq!(fnv1a_utf16("foobar"), 0xbf9cf968);
    }

    #[test]
    fn test_hex_rendering() {
        assert_eq!(render_hex(0), "00000000");
        assert_eq!(render_hex(0xabc), "00000ABC");
        assert_eq!(render_hex(u32::MAX), "FFFFFFFF");
    }

    #[test]
    fn test_joined_layout() {
        assert_eq!(
            inputs().joined(),
            "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0\
             ###en-US###24###-60###AAAAAElFTkSuQmCC###8###8"
        );
    }

    #[test]
    fn test_missing_memory_renders_empty() {
        let mut without = inputs();
        without.device_memory = None;
        assert!(without.joined().ends_with("###8###"));

        let mut fractional = inputs();
        fractional.device_memory = Some(0.5);
        assert!(fractional.joined().ends_with("###8###0.5"));
    }

    #[test]
    fn test_missing_cores_render_empty() {
        let without = VisitorIdInputs { hardware_concurrency: None, device_memory: None, ..inputs() };
        assert!(without.joined().ends_with("###AAAAAElFTkSuQmCC######"));
        assert_ne!(without.visitor_id(), VisitorIdInputs { hardware_concurrency: Some(0), ..without.clone() }.visitor_id());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(inputs().visitor_id(), inputs().visitor_id());
    }

    #[test]
    fn test_each_input_changes_id() {
        let base = inputs().visitor_id();
        let variants = [
            VisitorIdInputs { user_agent: "Other".into(), ..inputs() },
            VisitorIdInputs { language: "de-DE".into(), ..inputs() },
            VisitorIdInputs { color_depth: 30, ..inputs() },
            VisitorIdInputs { timezone_offset_minutes: 0, ..inputs() },
            VisitorIdInputs { canvas_signature: "blocked".into(), ..inputs() },
            VisitorIdInputs { hardware_concurrency: Some(4), ..inputs() },
            VisitorIdInputs { device_memory: Some(4.0), ..inputs() },
        ];
        for variant in &variants {
            assert_ne!(variant.visitor_id(), base, "{:?}", variant);
        }
    }

    #[test]
    fn test_format() {
        let id = inputs().visitor_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }
}
