//! The application context shared by the pipeline components.
//!
//! Built once at startup and handed to each component by `Rc`, so there is no
//! hidden global editor, store, or renderer and tests can assemble one from
//! fakes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EditorConfig;
use crate::preview::{MarkdownConverter, PreviewRenderer, PreviewShell, PreviewSurface};
use crate::storage::{KeyValueStore, PersistenceStore};

/// The text editing widget, as seen by the sync pipeline.
///
/// The widget owns the document; the pipeline only reads it and seeds it once
/// at startup.
pub trait EditorWidget {
    /// Full current document text.
    fn text(&self) -> String;

    /// Whether an input method composition is in progress.
    fn is_composing(&self) -> bool;

    /// Replace the whole document.
    fn replace_all(&self, text: &str);
}

impl<T: EditorWidget + ?Sized> EditorWidget for Rc<T> {
    fn text(&self) -> String {
        (**self).text()
    }

    fn is_composing(&self) -> bool {
        (**self).is_composing()
    }

    fn replace_all(&self, text: &str) {
        (**self).replace_all(text)
    }
}

pub struct AppContext {
    pub config: EditorConfig,
    pub editor: Rc<dyn EditorWidget>,
    pub preview: RefCell<PreviewRenderer>,
    pub store: PersistenceStore,
}

impl AppContext {
    pub fn new(
        config: EditorConfig,
        editor: Rc<dyn EditorWidget>,
        preview: PreviewRenderer,
        store: PersistenceStore,
    ) -> Rc<Self> {
        Rc::new(Self {
            config,
            editor,
            preview: RefCell::new(preview),
            store,
        })
    }

    /// Assemble the renderer and store the way `config` describes.
    pub fn from_config(
        config: EditorConfig,
        editor: Rc<dyn EditorWidget>,
        converter: impl MarkdownConverter + 'static,
        surface: impl PreviewSurface + 'static,
        backend: impl KeyValueStore + 'static,
    ) -> Rc<Self> {
        let preview = PreviewRenderer::new(
            converter,
            surface,
            PreviewShell::from_config(&config),
            config.delivery,
        );
        let store = PersistenceStore::new(backend, config.cache_key.clone());
        Self::new(config, editor, preview, store)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// Editor fake with a settable composition flag.
    #[derive(Default)]
    pub(crate) struct FakeEditor {
        pub text: RefCell<String>,
        pub composing: Cell<bool>,
        pub replacements: Cell<usize>,
    }

    impl EditorWidget for FakeEditor {
        fn text(&self) -> String {
            self.text.borrow().clone()
        }

        fn is_composing(&self) -> bool {
            self.composing.get()
        }

        fn replace_all(&self, text: &str) {
            *self.text.borrow_mut() = text.to_string();
            self.replacements.set(self.replacements.get() + 1);
        }
    }

    #[test]
    fn test_from_config_uses_cache_key() {
        use crate::preview::tests::RecordingSurface;
        use crate::{ComrakConverter, MemoryStore};

        let backend = Rc::new(MemoryStore::new());
        let config = EditorConfig {
            cache_key: "custom-key".into(),
            ..EditorConfig::default()
        };
        let ctx = AppContext::from_config(
            config,
            Rc::new(FakeEditor::default()),
            ComrakConverter::new(),
            Rc::new(RecordingSurface::default()),
            backend.clone(),
        );

        ctx.store.save("x");
        assert_eq!(ctx.store.key(), "custom-key");
        assert_eq!(backend.get("custom-key").as_deref(), Some("x"));
    }
}
