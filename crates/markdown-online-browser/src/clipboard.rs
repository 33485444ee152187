//! Image extraction from paste events.
//!
//! Pasted images are read as bytes and turned into `data:` URLs with
//! `markdown_online_core::encode_data_url`.

use js_sys::Uint8Array;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use markdown_online_core::encode_data_url;

/// Image files carried by a paste event, in clipboard order.
pub fn image_files(evt: &web_sys::ClipboardEvent) -> Vec<web_sys::File> {
    let Some(data) = evt.clipboard_data() else {
        return Vec::new();
    };
    let items = data.items();
    (0..items.length())
        .filter_map(|i| items.get(i))
        .filter(|item| item.kind() == "file" && item.type_().starts_with("image/"))
        .filter_map(|item| item.get_as_file().ok().flatten())
        .collect()
}

/// Read a file into a base64 `data:` URL.
pub async fn read_data_url(file: &web_sys::File) -> Result<String, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    let mime = file.type_();
    let mime = if mime.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime
    };
    Ok(encode_data_url(&mime, &bytes))
}
