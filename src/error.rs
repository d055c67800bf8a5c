//! Error types for device probes
//!
//! Probe failures never reach the caller of `collect()`. They exist so each
//! probe can say *why* it degraded, and so the collector can turn that into
//! the right in-band sentinel:
//! - absent capability → `"unavailable"`
//! - capability that threw or was refused → `"blocked"`
//! - capability present but withholding detail → `"hidden"`

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Capability errors (1xx)
    CapabilityAbsent = 100,
    CapabilityBlocked = 101,
    CapabilityDegraded = 102,

    // Host errors (2xx)
    JsException = 200,

    // Export errors (3xx)
    SerializationFailed = 300,
}

/// Main error type for probe failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Capability blocked: {0}")]
    Blocked(String),

    #[error("Capability hidden: {0}")]
    Hidden(String),

    #[error("JavaScript exception: {0}")]
    Js(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ProbeError {
    /// Get the error code for programmatic handling
    pub fn code(&self) -> ErrorCode {
        match self {
            ProbeError::Unavailable(_) => ErrorCode::CapabilityAbsent,
            ProbeError::Blocked(_) => ErrorCode::CapabilityBlocked,
            ProbeError::Hidden(_) => ErrorCode::CapabilityDegraded,
            ProbeError::Js(_) => ErrorCode::JsException,
            ProbeError::Serialization(_) => ErrorCode::SerializationFailed,
        }
    }

    /// The in-band sentinel a snapshot field takes when its probe fails
    /// with this error.
    ///
    /// A thrown JS exception counts as a block: the API exists but refused.
    pub fn sentinel(&self) -> &'static str {
        match self {
            ProbeError::Unavailable(_) => "unavailable",
            ProbeError::Hidden(_) => "hidden",
            ProbeError::Blocked(_) | ProbeError::Js(_) | ProbeError::Serialization(_) => {
                "blocked"
            }
        }
    }

    /// Whether the host lacks the API entirely, as opposed to refusing it.
    pub fn is_absent(&self) -> bool {
        matches!(self, ProbeError::Unavailable(_))
    }

    /// Build a `Js` error from a thrown JS value, keeping whatever message
    /// the exception carries.
    pub fn from_js(value: &JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", value));
        ProbeError::Js(message)
    }
}

impl From<JsValue> for ProbeError {
    fn from(value: JsValue) -> Self {
        ProbeError::from_js(&value)
    }
}

impl From<serde_wasm_bindgen::Error> for ProbeError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        ProbeError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Serialization(err.to_string())
    }
}

impl From<ProbeError> for JsValue {
    fn from(err: ProbeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(ProbeError::Unavailable("canvas".into()).sentinel(), "unavailable");
        assert_eq!(ProbeError::Blocked("canvas".into()).sentinel(), "blocked");
        assert_eq!(ProbeError::Hidden("webgl".into()).sentinel(), "hidden");
        assert_eq!(ProbeError::Js("SecurityError".into()).sentinel(), "blocked");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ProbeError::Unavailable("x".into()).code(),
            ErrorCode::CapabilityAbsent
        );
        assert_eq!(ProbeError::Hidden("x".into()).code(), ErrorCode::CapabilityDegraded);
        assert_eq!(ProbeError::Js("x".into()).code(), ErrorCode::JsException);
    }

    #[test]
    fn test_absence_is_distinct_from_block() {
        assert!(ProbeError::Unavailable("battery".into()).is_absent());
        assert!(!ProbeError::Blocked("battery".into()).is_absent());
        assert!(!ProbeError::Hidden("webgl".into()).is_absent());
    }
}
