//! Peer connection used only to observe host ICE candidates.
//!
//! No ICE servers are configured, so gathering yields host (and possibly
//! mDNS) candidates only. Candidates are forwarded from the
//! `onicecandidate` callback through a channel; the end-of-candidates event
//! closes the stream.

use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::StreamExt;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{RtcConfiguration, RtcPeerConnection, RtcPeerConnectionIceEvent, RtcSessionDescriptionInit};

use super::js_helpers;
use crate::error::Result;
use crate::host::{Capability, IceGatherer};

pub struct BrowserIceGatherer {
    pc: RtcPeerConnection,
    candidates: UnboundedReceiver<Option<String>>,
    // Store closure to prevent garbage collection
    _on_candidate: Closure<dyn FnMut(JsValue)>,
    closed: bool,
}

impl BrowserIceGatherer {
    /// Create the connection, open a data channel and start gathering by
    /// setting a local offer.
    pub fn open() -> Result<Capability<Self>> {
        if js_helpers::get_global("RTCPeerConnection").is_none() {
            return Ok(Capability::Unavailable);
        }

        let config = RtcConfiguration::new();
        config.set_ice_servers(&js_sys::Array::new());
        let pc = RtcPeerConnection::new_with_configuration(&config)?;
        pc.create_data_channel("");

        let (tx, rx) = mpsc::unbounded();
        let on_candidate = Closure::wrap(Box::new(move |event: JsValue| {
            let event: RtcPeerConnectionIceEvent = event.unchecked_into();
            let _ = tx.unbounded_send(event.candidate().map(|c| c.candidate()));
        }) as Box<dyn FnMut(JsValue)>);
        pc.set_onicecandidate(Some(on_candidate.as_ref().unchecked_ref()));

        let offer_pc = pc.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let offer = match JsFuture::from(offer_pc.create_offer()).await {
                Ok(offer) => offer,
                Err(e) => {
                    log::debug!("createOffer failed: {:?}", e);
                    return;
                }
            };
            let desc: RtcSessionDescriptionInit = offer.unchecked_into();
            if let Err(e) = JsFuture::from(offer_pc.set_local_description(&desc)).await {
                log::debug!("setLocalDescription failed: {:?}", e);
            }
        });

        Ok(Capability::Available(Self {
            pc,
            candidates: rx,
            _on_candidate: on_candidate,
            closed: false,
        }))
    }
}

#[async_trait(?Send)]
impl IceGatherer for BrowserIceGatherer {
    async fn next_candidate(&mut self) -> Option<String> {
        // A `None` item is the end-of-candidates event.
        self.candidates.next().await.flatten()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.pc.set_onicecandidate(None);
        self.pc.close();
        self.closed = true;
    }
}

impl Drop for BrowserIceGatherer {
    fn drop(&mut self) {
        self.close();
    }
}
