//! The mounted application.

use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::prelude::*;

use markdown_online_browser::{
    AppContext, BrowserTimer, ChangePipeline, ComrakConverter, DocumentChange, EditorConfig,
    EditorWidget, IframeSurface, LocalStore, MarkdownConverter, SplitPane, TextareaEditor,
};

use crate::handle::JsEditorHandle;

/// A live editor mounted on the page.
///
/// Dropping it (`free()` from JS) removes its listeners.
#[wasm_bindgen]
pub struct MarkdownOnline {
    pipeline: Rc<ChangePipeline>,
    split: SplitPane,
    _textarea: Option<Rc<TextareaEditor>>,
    _page_hide: Option<EventListener>,
}

fn parse_config(config: JsValue) -> Result<EditorConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(EditorConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

impl MarkdownOnline {
    fn build(
        config: EditorConfig,
        editor: Rc<dyn EditorWidget>,
        textarea: Option<Rc<TextareaEditor>>,
    ) -> Result<Self, JsError> {
        let surface = IframeSurface::from_id(&config.elements.preview)?;
        let split = SplitPane::attach(&config)?;

        let ctx = AppContext::from_config(
            config,
            editor,
            ComrakConverter::new(),
            surface,
            LocalStore::new(),
        );
        let pipeline = Rc::new(ChangePipeline::new(ctx, BrowserTimer::new()));
        pipeline.restore();

        if let Some(textarea) = &textarea {
            let sink = pipeline.clone();
            textarea.on_change(move |change| sink.on_change(change));
            textarea.enable_image_paste();
        }

        let page_hide = web_sys::window().map(|window| {
            let weak = Rc::downgrade(&pipeline);
            EventListener::new(&window, "pagehide", move |_| {
                if let Some(pipeline) = weak.upgrade() {
                    pipeline.flush();
                }
            })
        });

        tracing::info!("markdown-online mounted");
        Ok(Self {
            pipeline,
            split,
            _textarea: textarea,
            _page_hide: page_hide,
        })
    }
}

#[wasm_bindgen]
impl MarkdownOnline {
    /// Mount on the page elements named by `config` (or the default ids),
    /// creating a textarea editor inside the editor wrapper.
    pub fn mount(config: JsValue) -> Result<MarkdownOnline, JsError> {
        let config = parse_config(config)?;
        let textarea = TextareaEditor::create(&config.elements.editor_wrapper, &config.placeholder)?;
        Self::build(config, textarea.clone(), Some(textarea))
    }

    /// Mount around an external editor. The host calls `notifyChange()` from
    /// the editor's change listener.
    #[wasm_bindgen(js_name = mountWithEditor)]
    pub fn mount_with_editor(
        editor: JsEditorHandle,
        config: JsValue,
    ) -> Result<MarkdownOnline, JsError> {
        let config = parse_config(config)?;
        Self::build(config, Rc::new(editor), None)
    }

    /// Report that the external editor's document changed.
    #[wasm_bindgen(js_name = notifyChange)]
    pub fn notify_change(&self) {
        let editor = &self.pipeline.context().editor;
        self.pipeline
            .on_change(DocumentChange::new(editor.text(), editor.is_composing()));
    }

    /// Commit a pending edit burst immediately.
    pub fn flush(&self) {
        self.pipeline.flush();
    }

    /// Current document text.
    pub fn markdown(&self) -> String {
        self.pipeline.context().editor.text()
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.split.is_dragging()
    }
}

/// Convert markdown to HTML with the preview's converter settings.
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(text: &str) -> String {
    ComrakConverter::new().to_html(text)
}
