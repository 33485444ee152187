//! WASM bindings for the markdown-online live editor.
//!
//! `MarkdownOnline.mount()` builds the whole page: a textarea editor, the
//! sandboxed preview, the split-pane divider, and the cached document.
//! `MarkdownOnline.mountWithEditor()` does the same around an editor widget
//! the host page already owns.

mod app;
mod handle;

pub use app::*;
pub use handle::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and route `tracing` to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
