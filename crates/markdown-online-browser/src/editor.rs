//! `<textarea>` editor widget.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, HtmlTextAreaElement, InputEvent};

use markdown_online_core::{
    DocumentChange, EditorWidget, Error, image_markdown, insert_at_utf16,
};

use crate::clipboard::{image_files, read_data_url};
use crate::dom::{describe, document, element_by_id, js_error};

/// A plain textarea created inside the editor wrapper.
///
/// Composition is tracked from `compositionstart`/`compositionend`, so
/// `is_composing()` stays accurate between input events.
pub struct TextareaEditor {
    textarea: HtmlTextAreaElement,
    composing: Rc<Cell<bool>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl TextareaEditor {
    /// Create the textarea inside `#wrapper_id`.
    pub fn create(wrapper_id: &str, placeholder: &str) -> Result<Rc<Self>, Error> {
        let wrapper = element_by_id::<HtmlElement>(wrapper_id)?;
        let textarea = document()?
            .create_element("textarea")
            .map_err(js_error)?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| Error::from("created element is not a textarea"))?;

        textarea.set_placeholder(placeholder);
        textarea.set_wrap("soft");
        textarea.set_spellcheck(false);
        textarea.set_class_name("editor");
        wrapper.append_child(&textarea).map_err(js_error)?;

        Ok(Self::wrap(textarea))
    }

    /// Wrap an existing textarea.
    pub fn wrap(textarea: HtmlTextAreaElement) -> Rc<Self> {
        let composing = Rc::new(Cell::new(false));
        let start = {
            let composing = composing.clone();
            EventListener::new(&textarea, "compositionstart", move |_| composing.set(true))
        };
        let end = {
            let composing = composing.clone();
            EventListener::new(&textarea, "compositionend", move |_| composing.set(false))
        };

        Rc::new(Self {
            textarea,
            composing,
            listeners: RefCell::new(vec![start, end]),
        })
    }

    pub fn textarea(&self) -> &HtmlTextAreaElement {
        &self.textarea
    }

    /// Report every content change to `handler`.
    ///
    /// `input` events during a composition are reported as composing; the
    /// final `compositionend` is reported as an ordinary change.
    pub fn on_change(&self, handler: impl Fn(DocumentChange) + 'static) {
        let handler = Rc::new(handler);

        let input = {
            let handler = handler.clone();
            let composing = self.composing.clone();
            let textarea = self.textarea.clone();
            EventListener::new(&self.textarea, "input", move |evt| {
                let ime = evt
                    .dyn_ref::<InputEvent>()
                    .is_some_and(|e| e.is_composing());
                handler(DocumentChange::new(textarea.value(), composing.get() || ime));
            })
        };
        let end = {
            let textarea = self.textarea.clone();
            EventListener::new(&self.textarea, "compositionend", move |_| {
                handler(DocumentChange::new(textarea.value(), false));
            })
        };

        self.listeners.borrow_mut().extend([input, end]);
    }

    /// Insert `snippet` at the caret and report it like a typed edit.
    pub fn insert_at_caret(&self, snippet: &str) {
        let value = self.textarea.value();
        let caret = self
            .textarea
            .selection_start()
            .ok()
            .flatten()
            .map(|c| c as usize)
            .unwrap_or(usize::MAX);

        let (text, after) = insert_at_utf16(&value, caret, snippet);
        self.textarea.set_value(&text);
        let after = u32::try_from(after).unwrap_or(u32::MAX);
        let _ = self.textarea.set_selection_range(after, after);

        match Event::new("input") {
            Ok(evt) => {
                let _ = self.textarea.dispatch_event(&evt);
            }
            Err(e) => tracing::warn!(error = %describe(&e), "could not signal inserted text"),
        }
    }

    /// Embed pasted images as `data:` URL image references.
    pub fn enable_image_paste(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let paste = EventListener::new(&self.textarea, "paste", move |evt| {
            let Some(evt) = evt.dyn_ref::<web_sys::ClipboardEvent>() else {
                return;
            };
            for file in image_files(evt) {
                let weak = weak.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match read_data_url(&file).await {
                        Ok(url) => {
                            if let Some(editor) = weak.upgrade() {
                                tracing::debug!(bytes = url.len(), "inserting pasted image");
                                editor.insert_at_caret(&image_markdown(&url));
                            }
                        }
                        Err(e) => tracing::warn!(error = %describe(&e), "reading pasted image failed"),
                    }
                });
            }
        });
        self.listeners.borrow_mut().push(paste);
    }
}

impl EditorWidget for TextareaEditor {
    fn text(&self) -> String {
        self.textarea.value()
    }

    fn is_composing(&self) -> bool {
        self.composing.get()
    }

    fn replace_all(&self, text: &str) {
        self.textarea.set_value(text);
    }
}
