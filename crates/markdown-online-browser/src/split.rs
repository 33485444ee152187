//! Split-pane divider wiring.
//!
//! Feeds pointer, media query and resize observer events into a
//! `ResizeController` and applies its effects to the page.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, HtmlElement, MediaQueryList, MediaQueryListEvent, MouseEvent,
    ResizeObserver, ResizeObserverEntry,
};

use markdown_online_core::{
    DragHost, EditorConfig, Error, PaneSize, PointerPosition, ResizeController, ScreenClass,
};

use crate::dom::{describe, document, element_by_id, js_error, window};

/// Class set on `<body>` while the divider is held.
pub const DRAGGING_CLASS: &str = "dragging";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, ResizeObserver)>;

struct SplitInner {
    controller: RefCell<ResizeController>,
    document: Document,
    body: HtmlElement,
    pane: HtmlElement,
    readout: Element,
    drag_listeners: RefCell<Option<[EventListener; 2]>>,
    observer: Option<(ResizeObserver, ObserverCallback)>,
    this: Weak<SplitInner>,
}

impl SplitInner {
    fn pointer_listener(
        &self,
        event: &'static str,
        on_event: fn(&SplitInner, &MouseEvent),
    ) -> EventListener {
        let weak = self.this.clone();
        EventListener::new(&self.document, event, move |evt| {
            let (Some(inner), Some(evt)) = (weak.upgrade(), evt.dyn_ref::<MouseEvent>()) else {
                return;
            };
            on_event(&inner, evt);
        })
    }
}

impl DragHost for SplitInner {
    fn set_dragging_marker(&self, on: bool) {
        let classes = self.body.class_list();
        let result = if on {
            classes.add_1(DRAGGING_CLASS)
        } else {
            classes.remove_1(DRAGGING_CLASS)
        };
        if let Err(e) = result {
            tracing::warn!(error = %describe(&e), "toggling drag marker failed");
        }
    }

    fn attach_drag_listeners(&self) {
        let moved = self.pointer_listener("pointermove", |inner, evt| {
            let position = PointerPosition::new(evt.client_x(), evt.client_y());
            inner.controller.borrow_mut().pointer_move(inner, position);
        });
        let released = self.pointer_listener("pointerup", |inner, _| {
            inner.controller.borrow_mut().pointer_up(inner);
        });
        *self.drag_listeners.borrow_mut() = Some([moved, released]);
    }

    fn detach_drag_listeners(&self) {
        let listeners = self.drag_listeners.borrow_mut().take();
        drop(listeners);
    }

    fn observe_readout(&self) {
        if let Some((observer, _)) = &self.observer {
            observer.observe(&self.readout);
        }
    }

    fn unobserve_readout(&self) {
        if let Some((observer, _)) = &self.observer {
            observer.unobserve(&self.readout);
        }
    }

    fn set_pane_size(&self, size: PaneSize) {
        if let Err(e) = self
            .pane
            .style()
            .set_property(size.property(), &size.css_value())
        {
            tracing::warn!(error = %describe(&e), "setting pane size failed");
        }
    }

    fn set_readout(&self, text: &str) {
        self.readout.set_text_content(Some(text));
    }
}

fn resize_observer(weak: Weak<SplitInner>) -> Option<(ResizeObserver, ObserverCallback)> {
    let callback: ObserverCallback =
        Closure::new(move |entries: js_sys::Array, _observer: ResizeObserver| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<ResizeObserverEntry>() else {
                    continue;
                };
                let rect = entry.content_rect();
                inner
                    .controller
                    .borrow()
                    .size_observed(&*inner, rect.width(), rect.height());
            }
        });

    match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => Some((observer, callback)),
        Err(e) => {
            tracing::warn!(error = %describe(&e), "ResizeObserver unavailable, size readout disabled");
            None
        }
    }
}

/// The divider between editor and preview.
///
/// Dropping it removes every listener it installed.
pub struct SplitPane {
    inner: Rc<SplitInner>,
    _pointer_down: EventListener,
    _media: Option<(MediaQueryList, EventListener)>,
}

impl SplitPane {
    /// Wire up the elements named in `config.elements`.
    pub fn attach(config: &EditorConfig) -> Result<Self, Error> {
        let ids = &config.elements;
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| Error::MissingElement("body".to_string()))?;
        let pane = element_by_id::<HtmlElement>(&ids.editor_wrapper)?;
        let dragger = element_by_id::<Element>(&ids.dragger)?;
        let readout = element_by_id::<Element>(&ids.readout)?;

        let media = window()?
            .match_media(&config.narrow_query)
            .map_err(js_error)?;
        let screen = ScreenClass::from_matches(media.as_ref().is_some_and(|m| m.matches()));

        let inner = Rc::new_cyclic(|this: &Weak<SplitInner>| SplitInner {
            controller: RefCell::new(ResizeController::new(screen)),
            document,
            body,
            pane,
            readout,
            drag_listeners: RefCell::new(None),
            observer: resize_observer(this.clone()),
            this: this.clone(),
        });

        let pointer_down = {
            let weak = Rc::downgrade(&inner);
            EventListener::new(&dragger, "pointerdown", move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.controller.borrow_mut().pointer_down(&*inner);
                }
            })
        };

        let media = media.map(|mql| {
            let weak = Rc::downgrade(&inner);
            let listener = EventListener::new(&mql, "change", move |evt| {
                let (Some(inner), Some(evt)) =
                    (weak.upgrade(), evt.dyn_ref::<MediaQueryListEvent>())
                else {
                    return;
                };
                inner.controller.borrow_mut().media_changed(evt.matches());
            });
            (mql, listener)
        });
        if media.is_none() {
            tracing::warn!(query = %config.narrow_query, "media query unsupported, assuming wide screen");
        }

        tracing::debug!(?screen, "split pane attached");
        Ok(Self {
            inner,
            _pointer_down: pointer_down,
            _media: media,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.controller.borrow().is_dragging()
    }

    pub fn screen(&self) -> ScreenClass {
        self.inner.controller.borrow().screen()
    }
}

impl Drop for SplitPane {
    fn drop(&mut self) {
        let mut controller = self.inner.controller.borrow_mut();
        controller.pointer_up(&*self.inner);
        drop(controller);
        if let Some((observer, _)) = &self.inner.observer {
            observer.disconnect();
        }
    }
}
