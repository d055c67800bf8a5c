//! One-shot high-accuracy position fix.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Geolocation, PositionOptions};

use super::js_helpers::{f64_of, prop_of, string_of};
use crate::error::{ProbeError, Result};
use crate::host::Capability;
use crate::location::GeoFix;

/// `GeolocationPositionError.PERMISSION_DENIED`.
const PERMISSION_DENIED: f64 = 1.0;

type Reply = Rc<RefCell<Option<oneshot::Sender<Result<GeoFix>>>>>;

fn read_fix(position: &JsValue) -> Result<GeoFix> {
    let coords = prop_of(position, "coords")
        .ok_or_else(|| ProbeError::Js("position has no coords".into()))?;
    let required = |name: &str| {
        f64_of(&coords, name).ok_or_else(|| ProbeError::Js(format!("coords.{} missing", name)))
    };

    Ok(GeoFix {
        latitude: required("latitude")?,
        longitude: required("longitude")?,
        accuracy: required("accuracy")?,
        altitude: f64_of(&coords, "altitude"),
        altitude_accuracy: f64_of(&coords, "altitudeAccuracy"),
        heading: f64_of(&coords, "heading").filter(|h| !h.is_nan()),
        speed: f64_of(&coords, "speed"),
    })
}

fn read_error(error: &JsValue) -> ProbeError {
    let message = string_of(error, "message").unwrap_or_default();
    match f64_of(error, "code") {
        Some(code) if code == PERMISSION_DENIED => ProbeError::Blocked(message),
        _ => ProbeError::Js(message),
    }
}

fn reply(slot: &Reply, outcome: Result<GeoFix>) {
    if let Some(tx) = slot.borrow_mut().take() {
        let _ = tx.send(outcome);
    }
}

/// Watch the position until the first callback fires, then clear the watch.
pub async fn current_position(navigator: &JsValue) -> Result<Capability<GeoFix>> {
    let Some(geolocation) = prop_of(navigator, "geolocation") else {
        return Ok(Capability::Unavailable);
    };
    let geolocation: Geolocation = geolocation.unchecked_into();

    let (tx, rx) = oneshot::channel();
    let slot: Reply = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let slot = slot.clone();
        Closure::wrap(Box::new(move |position: JsValue| {
            reply(&slot, read_fix(&position));
        }) as Box<dyn FnMut(JsValue)>)
    };
    let on_error = {
        let slot = slot.clone();
        Closure::wrap(Box::new(move |error: JsValue| {
            reply(&slot, Err(read_error(&error)));
        }) as Box<dyn FnMut(JsValue)>)
    };

    let options = PositionOptions::new();
    options.set_enable_high_accuracy(true);
    options.set_maximum_age(0);

    let watch_id = geolocation.watch_position_with_error_callback_and_options(
        on_success.as_ref().unchecked_ref(),
        Some(on_error.as_ref().unchecked_ref()),
        &options,
    )?;

    let outcome = rx.await;
    geolocation.clear_watch(watch_id);
    drop((on_success, on_error));

    match outcome {
        Ok(fix) => fix.map(Capability::Available),
        Err(oneshot::Canceled) => Err(ProbeError::Js("position watch ended without a reply".into())),
    }
}
