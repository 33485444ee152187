//! Inline image paste.
//!
//! Pasted images are embedded directly in the document as base64 data URLs,
//! so the document stays a single self-contained string.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// `data:` URL for `bytes` of the given MIME type.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Markdown image reference for a pasted image, on its own line.
pub fn image_markdown(data_url: &str) -> String {
    format!("\n![image]({})\n", data_url)
}

/// Insert `snippet` into `text` at a UTF-16 code unit offset, as reported by
/// DOM selection APIs. Offsets past the end append; an offset that splits a
/// surrogate pair moves past the whole character.
///
/// Returns the new text and the UTF-16 offset just after the snippet.
pub fn insert_at_utf16(text: &str, utf16_offset: usize, snippet: &str) -> (String, usize) {
    let mut units = 0;
    let mut byte_index = text.len();
    for (idx, c) in text.char_indices() {
        if units >= utf16_offset {
            byte_index = idx;
            break;
        }
        units += c.len_utf16();
    }

    let mut out = String::with_capacity(text.len() + snippet.len());
    out.push_str(&text[..byte_index]);
    out.push_str(snippet);
    out.push_str(&text[byte_index..]);

    let caret = units + snippet.encode_utf16().count();
    (out, caret)
}
