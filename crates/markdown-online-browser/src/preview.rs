//! Sandboxed `<iframe>` preview surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsValue;
use web_sys::HtmlIFrameElement;

use markdown_online_core::{Error, PreviewSurface};

use crate::dom::{describe, element_by_id};

/// The sandbox token set applied to the frame. Scripts run (the message
/// listener and highlight.js), but the frame gets an opaque origin and cannot
/// reach the parent's storage or DOM.
pub const SANDBOX: &str = "allow-scripts";

#[derive(Default)]
struct FrameState {
    loaded: Cell<bool>,
    /// Latest fragment posted while the frame was still loading.
    queued: RefCell<Option<String>>,
}

/// Preview surface backed by an `<iframe>` whose document is set through
/// `srcdoc`.
///
/// Fragments are delivered with `postMessage`. The frame's origin is opaque,
/// so the target origin is `*`; the listener in the frame only accepts
/// messages whose source is its parent.
pub struct IframeSurface {
    frame: HtmlIFrameElement,
    state: Rc<FrameState>,
    _on_load: EventListener,
}

impl IframeSurface {
    /// Wrap an existing frame, applying the sandbox.
    pub fn new(frame: HtmlIFrameElement) -> Result<Self, Error> {
        frame
            .set_attribute("sandbox", SANDBOX)
            .map_err(crate::dom::js_error)?;

        let state = Rc::new(FrameState::default());
        let on_load = {
            let state = state.clone();
            let target = frame.clone();
            EventListener::new(&frame, "load", move |_| {
                state.loaded.set(true);
                let queued = state.queued.borrow_mut().take();
                if let Some(html) = queued {
                    tracing::trace!("delivering fragment queued during load");
                    post(&target, &html);
                }
            })
        };

        Ok(Self {
            frame,
            state,
            _on_load: on_load,
        })
    }

    /// Look up the frame by element id.
    pub fn from_id(id: &str) -> Result<Self, Error> {
        Self::new(element_by_id::<HtmlIFrameElement>(id)?)
    }

    pub fn frame(&self) -> &HtmlIFrameElement {
        &self.frame
    }

    pub fn is_loaded(&self) -> bool {
        self.state.loaded.get()
    }
}

fn post(frame: &HtmlIFrameElement, html: &str) {
    let Some(target) = frame.content_window() else {
        tracing::warn!("preview frame has no content window");
        return;
    };
    if let Err(e) = target.post_message(&JsValue::from_str(html), "*") {
        tracing::warn!(error = %describe(&e), "posting to preview frame failed");
    }
}

impl PreviewSurface for IframeSurface {
    fn load_document(&self, source: &str) {
        self.state.loaded.set(false);
        self.frame.set_srcdoc(source);
    }

    fn post_html(&self, html: &str) {
        if self.state.loaded.get() {
            post(&self.frame, html);
        } else {
            *self.state.queued.borrow_mut() = Some(html.to_string());
        }
    }
}
