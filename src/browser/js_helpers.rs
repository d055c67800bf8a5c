//! Reflect utility wrappers for reading optional and vendor-prefixed
//! browser properties.
//!
//! Many of the APIs the probes read (`navigator.deviceMemory`,
//! `navigator.connection`, `performance.memory`, `navigator.getBattery`) are
//! non-standard or engine-specific, so they are read by name rather than
//! through typed bindings.

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{ProbeError, Result};
use crate::host::Capability;

/// Get a property from the global scope.
pub fn get_global(prop: &str) -> Option<JsValue> {
    prop_of(&js_sys::global(), prop)
}

/// `obj[name]`, with `undefined` and `null` folded into `None`.
pub fn prop_of(obj: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(obj, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// First present property out of a list of vendor-prefixed spellings.
pub fn first_prop_of(obj: &JsValue, names: &[&str]) -> Option<JsValue> {
    names.iter().find_map(|name| prop_of(obj, name))
}

pub fn string_of(obj: &JsValue, name: &str) -> Option<String> {
    prop_of(obj, name).and_then(|v| v.as_string())
}

pub fn f64_of(obj: &JsValue, name: &str) -> Option<f64> {
    prop_of(obj, name).and_then(|v| v.as_f64())
}

pub fn bool_of(obj: &JsValue, name: &str) -> Option<bool> {
    prop_of(obj, name).and_then(|v| v.as_bool())
}

/// Resolve a global constructor, trying each spelling in turn
/// (e.g. `AudioContext`, then `webkitAudioContext`).
pub fn resolve_constructor(names: &[&str]) -> Capability<Function> {
    Capability::from_option(
        names
            .iter()
            .filter_map(|name| get_global(name))
            .find_map(|ctor| ctor.dyn_into::<Function>().ok()),
    )
}

/// Call `obj[method](...args)` with `obj` as `this`.
pub fn call_method(obj: &JsValue, method: &str, args: &Array) -> Result<JsValue> {
    let func: Function = prop_of(obj, method)
        .ok_or_else(|| ProbeError::Unavailable(method.to_string()))?
        .dyn_into()
        .map_err(|_| ProbeError::Unavailable(format!("{} is not a function", method)))?;
    Ok(Reflect::apply(&func, obj, args)?)
}

/// Await a promise (or a plain value, which resolves immediately).
pub async fn settle_promise(value: JsValue) -> Result<JsValue> {
    let promise = Promise::resolve(&value);
    Ok(JsFuture::from(promise).await?)
}

/// Collect a JS array-like (`length` + indexed access) into values.
pub fn array_like(obj: &JsValue) -> Result<Vec<JsValue>> {
    let length = f64_of(obj, "length")
        .ok_or_else(|| ProbeError::Blocked("array-like has no length".into()))? as u32;
    (0..length)
        .map(|i| Reflect::get_u32(obj, i).map_err(ProbeError::from))
        .collect()
}
