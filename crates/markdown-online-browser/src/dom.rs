//! Element lookup and JS error conversion.

use wasm_bindgen::{JsCast, JsValue};

use markdown_online_core::Error;

pub fn window() -> Result<web_sys::Window, Error> {
    web_sys::window().ok_or_else(|| Error::from("no window"))
}

pub fn document() -> Result<web_sys::Document, Error> {
    window()?
        .document()
        .ok_or_else(|| Error::from("no document"))
}

/// Look up `#id` and cast it to the expected element type.
pub fn element_by_id<T: JsCast>(id: &str) -> Result<T, Error> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| Error::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| Error::Platform(format!("#{} is not the expected element type", id)))
}

/// Best-effort description of a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

pub fn js_error(value: JsValue) -> Error {
    Error::Platform(describe(&value))
}
