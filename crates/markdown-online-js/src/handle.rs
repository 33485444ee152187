//! External editor widgets supplied by the host page.

use wasm_bindgen::prelude::*;

use markdown_online_browser::EditorWidget;

#[wasm_bindgen(typescript_custom_section)]
const TS_EDITOR_HANDLE: &'static str = r#"
/** Minimal surface an external editor (CodeMirror, Monaco, ...) must expose. */
export interface EditorHandle {
  getText(): string;
  isComposing(): boolean;
  setText(text: string): void;
}
"#;

#[wasm_bindgen]
extern "C" {
    /// Duck-typed editor object passed to `mountWithEditor`.
    #[wasm_bindgen(typescript_type = "EditorHandle")]
    pub type JsEditorHandle;

    #[wasm_bindgen(method, structural, js_name = getText)]
    pub fn get_text(this: &JsEditorHandle) -> String;

    #[wasm_bindgen(method, structural, js_name = isComposing)]
    pub fn is_composing(this: &JsEditorHandle) -> bool;

    #[wasm_bindgen(method, structural, js_name = setText)]
    pub fn set_text(this: &JsEditorHandle, text: &str);
}

impl EditorWidget for JsEditorHandle {
    fn text(&self) -> String {
        self.get_text()
    }

    fn is_composing(&self) -> bool {
        JsEditorHandle::is_composing(self)
    }

    fn replace_all(&self, text: &str) {
        self.set_text(text);
    }
}
