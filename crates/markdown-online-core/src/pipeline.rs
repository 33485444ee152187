//! Editor change → debounced render + persist.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::context::AppContext;
use crate::debounce::Debouncer;
use crate::perf;
use crate::timer::Timer;

/// A content change reported by the editor widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    /// Full document text after the change.
    pub text: String,
    /// Whether the change is an intermediate IME composition state.
    pub composing: bool,
}

impl DocumentChange {
    pub fn new(text: impl Into<String>, composing: bool) -> Self {
        Self {
            text: text.into(),
            composing,
        }
    }
}

/// Drives preview and persistence from editor changes.
///
/// Changes are debounced; when the quiet period ends the preview is rendered
/// and the document is saved, in that order, in the same tick.
pub struct ChangePipeline {
    ctx: Rc<AppContext>,
    debouncer: RefCell<Debouncer<String>>,
    seeding: Cell<bool>,
}

impl ChangePipeline {
    pub fn new(ctx: Rc<AppContext>, timer: impl Timer + 'static) -> Self {
        let delay = ctx.config.debounce_delay();
        let commit_ctx = ctx.clone();
        let debouncer = Debouncer::new(timer, delay, move |text: String| {
            commit(&commit_ctx, &text)
        });

        Self {
            ctx,
            debouncer: RefCell::new(debouncer),
            seeding: Cell::new(false),
        }
    }

    pub fn context(&self) -> &Rc<AppContext> {
        &self.ctx
    }

    /// Feed a change from the editor.
    ///
    /// Composition states cancel any pending commit: nothing is rendered until
    /// a change arrives with the composition finished.
    pub fn on_change(&self, change: DocumentChange) {
        if self.seeding.get() {
            tracing::trace!("ignoring change caused by startup seed");
            return;
        }

        if change.composing {
            tracing::trace!("composition in progress, commit deferred");
            self.debouncer.borrow_mut().cancel();
            return;
        }

        self.debouncer.borrow_mut().call(change.text);
    }

    /// Whether a commit is waiting for the quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.debouncer.borrow().is_pending()
    }

    /// Commit a pending change right away, using the editor's current text.
    pub fn flush(&self) {
        let mut debouncer = self.debouncer.borrow_mut();
        if !debouncer.is_pending() {
            return;
        }
        debouncer.cancel();
        drop(debouncer);

        tracing::debug!("flushing pending commit");
        commit(&self.ctx, &self.ctx.editor.text());
    }

    /// Startup: install the preview shell, then restore the cached document
    /// into both the preview and the editor.
    ///
    /// The store is read once. Returns whether a document was restored.
    pub fn restore(&self) -> bool {
        self.ctx.preview.borrow_mut().init();

        let Some(cached) = self.ctx.store.load().filter(|text| !text.is_empty()) else {
            tracing::debug!(key = self.ctx.store.key(), "no cached document");
            return false;
        };

        self.ctx.preview.borrow_mut().render(&cached);

        // The widget may report the seed as an ordinary change; the preview
        // already shows it and the store already holds it.
        self.seeding.set(true);
        self.ctx.editor.replace_all(&cached);
        self.seeding.set(false);

        tracing::debug!(bytes = cached.len(), "restored cached document");
        true
    }
}

fn commit(ctx: &AppContext, text: &str) {
    // The composition may have started after the change was queued.
    if ctx.editor.is_composing() {
        tracing::trace!("composition in progress at commit time, skipping cycle");
        return;
    }

    ctx.preview.borrow_mut().render(text);
    perf::measure("persist document", || ctx.store.save(text));
    tracing::debug!(bytes = text.len(), "committed document");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeliveryStrategy, EditorConfig};
    use crate::context::EditorWidget;
    use crate::context::tests::FakeEditor;
    use crate::preview::ComrakConverter;
    use crate::preview::tests::RecordingSurface;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::timer::ManualClock;
    use std::time::Duration;

    struct Harness {
        clock: ManualClock,
        editor: Rc<FakeEditor>,
        surface: Rc<RecordingSurface>,
        backend: Rc<MemoryStore>,
        pipeline: ChangePipeline,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_backend(MemoryStore::new())
        }

        fn with_backend(backend: MemoryStore) -> Self {
            let clock = ManualClock::new();
            let editor = Rc::new(FakeEditor::default());
            let surface = Rc::new(RecordingSurface::default());
            let backend = Rc::new(backend);
            let ctx = AppContext::from_config(
                EditorConfig::default(),
                editor.clone(),
                ComrakConverter::new(),
                surface.clone(),
                backend.clone(),
            );
            let pipeline = ChangePipeline::new(ctx, clock.timer());
            Self {
                clock,
                editor,
                surface,
                backend,
                pipeline,
            }
        }

        /// Type `text` into the fake editor and report it.
        fn edit(&self, text: &str) {
            *self.editor.text.borrow_mut() = text.to_string();
            self.pipeline
                .on_change(DocumentChange::new(text, self.editor.composing.get()));
        }

        fn wait(&self, ms: u64) {
            self.clock.advance(Duration::from_millis(ms));
        }

        fn stored(&self) -> Option<String> {
            self.backend.get(crate::CACHE_KEY)
        }

        fn messages(&self) -> Vec<String> {
            self.surface.messages.borrow().clone()
        }
    }

    #[test]
    fn test_burst_commits_once_with_last_text() {
        let h = Harness::new();

        h.edit("#");
        h.wait(100);
        h.edit("# ");
        h.wait(100);
        h.edit("# H");
        h.wait(100);
        h.edit("# Hi");

        h.wait(499);
        assert!(h.messages().is_empty());
        assert_eq!(h.stored(), None);

        h.wait(1);
        assert_eq!(h.messages(), vec!["<h1>Hi</h1>\n"]);
        assert_eq!(h.stored().as_deref(), Some("# Hi"));
    }

    #[test]
    fn test_heading_reaches_surface() {
        let h = Harness::new();
        h.edit("# Hi");
        h.wait(500);
        assert_eq!(h.messages()[0].trim_end(), "<h1>Hi</h1>");
    }

    #[test]
    fn test_composing_changes_never_commit() {
        let h = Harness::new();

        h.editor.composing.set(true);
        h.edit("に");
        h.edit("にほ");
        h.edit("にほん");
        h.wait(2000);
        assert!(h.messages().is_empty());
        assert_eq!(h.stored(), None);

        h.editor.composing.set(false);
        h.edit("日本");
        h.wait(500);
        assert_eq!(h.messages(), vec!["<p>日本</p>\n"]);
        assert_eq!(h.stored().as_deref(), Some("日本"));
    }

    #[test]
    fn test_composition_cancels_pending_commit() {
        let h = Harness::new();

        h.edit("a");
        h.wait(200);
        h.editor.composing.set(true);
        h.edit("aか");
        h.wait(1000);
        assert!(h.messages().is_empty());
        assert!(!h.pipeline.is_pending());
    }

    #[test]
    fn test_composition_started_during_delay_skips_cycle() {
        let h = Harness::new();

        h.edit("draft");
        h.wait(300);
        // Composition begins without a change event reaching us yet.
        h.editor.composing.set(true);
        h.wait(300);
        assert!(h.messages().is_empty());
        assert_eq!(h.stored(), None);

        h.editor.composing.set(false);
        h.edit("draft done");
        h.wait(500);
        assert_eq!(h.stored().as_deref(), Some("draft done"));
        assert_eq!(h.messages().len(), 1);
    }

    #[test]
    fn test_separate_bursts_commit_separately() {
        let h = Harness::new();

        h.edit("one");
        h.wait(600);
        h.edit("two");
        h.wait(600);

        assert_eq!(h.messages(), vec!["<p>one</p>\n", "<p>two</p>\n"]);
        assert_eq!(h.stored().as_deref(), Some("two"));
    }

    #[test]
    fn test_restore_seeds_editor_and_preview_once() {
        let backend = MemoryStore::new();
        backend.set(crate::CACHE_KEY, "# Saved").unwrap();
        let h = Harness::with_backend(backend);

        assert!(h.pipeline.restore());
        assert_eq!(h.editor.text(), "# Saved");
        assert_eq!(h.editor.replacements.get(), 1);
        assert_eq!(h.surface.documents.borrow().len(), 1);
        assert_eq!(h.messages(), vec!["<h1>Saved</h1>\n"]);

        h.wait(5000);
        assert_eq!(h.messages().len(), 1);
    }

    #[test]
    fn test_restore_ignores_change_echoed_by_seed() {
        // A widget that reports programmatic replacement as a change, the
        // way a CodeMirror update listener does.
        struct EchoingEditor {
            inner: FakeEditor,
            pipeline: RefCell<std::rc::Weak<ChangePipeline>>,
        }

        impl EditorWidget for EchoingEditor {
            fn text(&self) -> String {
                self.inner.text()
            }

            fn is_composing(&self) -> bool {
                false
            }

            fn replace_all(&self, text: &str) {
                self.inner.replace_all(text);
                if let Some(pipeline) = self.pipeline.borrow().upgrade() {
                    pipeline.on_change(DocumentChange::new(text, false));
                }
            }
        }

        let clock = ManualClock::new();
        let backend = MemoryStore::new();
        backend.set(crate::CACHE_KEY, "cached").unwrap();
        let editor = Rc::new(EchoingEditor {
            inner: FakeEditor::default(),
            pipeline: RefCell::new(std::rc::Weak::new()),
        });
        let surface = Rc::new(RecordingSurface::default());
        let ctx = AppContext::from_config(
            EditorConfig::default(),
            editor.clone(),
            ComrakConverter::new(),
            surface.clone(),
            backend,
        );
        let pipeline = Rc::new(ChangePipeline::new(ctx, clock.timer()));
        *editor.pipeline.borrow_mut() = Rc::downgrade(&pipeline);

        assert!(pipeline.restore());
        assert!(!pipeline.is_pending());
        clock.advance(Duration::from_secs(1));
        assert_eq!(surface.messages.borrow().len(), 1);
    }

    #[test]
    fn test_restore_with_nothing_cached() {
        let h = Harness::new();

        assert!(!h.pipeline.restore());
        assert_eq!(h.editor.replacements.get(), 0);
        assert_eq!(h.surface.documents.borrow().len(), 1);
        assert!(h.messages().is_empty());
    }

    #[test]
    fn test_restore_treats_empty_cache_as_absent() {
        let backend = MemoryStore::new();
        backend.set(crate::CACHE_KEY, "").unwrap();
        let h = Harness::with_backend(backend);

        assert!(!h.pipeline.restore());
        assert_eq!(h.editor.replacements.get(), 0);
    }

    #[test]
    fn test_flush_commits_immediately() {
        let h = Harness::new();

        h.edit("unsaved");
        assert!(h.pipeline.is_pending());
        h.pipeline.flush();

        assert!(!h.pipeline.is_pending());
        assert_eq!(h.stored().as_deref(), Some("unsaved"));
        h.wait(1000);
        assert_eq!(h.messages().len(), 1);

        // Nothing pending: no-op.
        h.pipeline.flush();
        assert_eq!(h.messages().len(), 1);
    }

    #[test]
    fn test_persist_failure_still_renders() {
        let h = Harness::with_backend(MemoryStore::with_quota(4));

        h.edit("longer than four");
        h.wait(500);
        assert_eq!(h.messages().len(), 1);
        assert_eq!(h.stored(), None);
    }

    #[test]
    fn test_document_strategy_pipeline() {
        let clock = ManualClock::new();
        let surface = Rc::new(RecordingSurface::default());
        let ctx = AppContext::from_config(
            EditorConfig {
                delivery: DeliveryStrategy::Document,
                ..EditorConfig::default()
            },
            Rc::new(FakeEditor::default()),
            ComrakConverter::new(),
            surface.clone(),
            MemoryStore::new(),
        );
        let pipeline = ChangePipeline::new(ctx, clock.timer());

        pipeline.restore();
        pipeline.on_change(DocumentChange::new("# Hi", false));
        clock.advance(Duration::from_millis(500));

        let documents = surface.documents.borrow();
        assert_eq!(documents.len(), 2);
        assert!(documents[1].contains("<h1>Hi</h1>"));
        assert!(surface.messages.borrow().is_empty());
    }
}
