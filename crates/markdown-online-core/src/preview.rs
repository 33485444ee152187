//! Preview rendering into an isolated document.
//!
//! Markdown is converted to HTML by a `MarkdownConverter` and handed to a
//! `PreviewSurface`, which on the web is a sandboxed `<iframe>`. The surface
//! shares nothing with the host page: it either receives each render as a
//! posted message (`DeliveryStrategy::Message`), or has its whole document
//! source replaced (`DeliveryStrategy::Document`).

use std::fmt::Write;

use comrak::{Options, markdown_to_html};

use crate::config::{DeliveryStrategy, EditorConfig, HighlightAssets};
use crate::perf::TimingGuard;

/// Converts markdown source to an HTML fragment.
///
/// Implementations must be pure and must not fail on any input.
pub trait MarkdownConverter {
    fn to_html(&self, text: &str) -> String;
}

impl<F: Fn(&str) -> String> MarkdownConverter for F {
    fn to_html(&self, text: &str) -> String {
        self(text)
    }
}

/// CommonMark converter with the GFM extensions enabled.
///
/// Raw HTML in the source is omitted unless `with_raw_html(true)` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakConverter {
    raw_html: bool,
}

impl ComrakConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_html(mut self, allow: bool) -> Self {
        self.raw_html = allow;
        self
    }

    fn options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;

        options.render.unsafe_ = self.raw_html;

        options
    }
}

impl MarkdownConverter for ComrakConverter {
    fn to_html(&self, text: &str) -> String {
        markdown_to_html(text, &self.options())
    }
}

/// The isolated document the preview is shown in.
pub trait PreviewSurface {
    /// Replace the surface's entire document source, reloading it.
    fn load_document(&self, source: &str);

    /// Deliver an HTML fragment to the already-loaded document.
    fn post_html(&self, html: &str);
}

impl<T: PreviewSurface + ?Sized> PreviewSurface for std::rc::Rc<T> {
    fn load_document(&self, source: &str) {
        (**self).load_document(source)
    }

    fn post_html(&self, html: &str) {
        (**self).post_html(html)
    }
}

/// Replaces the body with each message from the parent and re-runs
/// highlight.js. Messages from anywhere else are ignored.
const MESSAGE_LISTENER: &str = "window.addEventListener('message', (event) => {
        if (event.source !== window.parent || typeof event.data !== 'string') return;
        document.body.innerHTML = event.data;
        if (window.hljs) window.hljs.highlightAll();
      });";

const HIGHLIGHT_ON_LOAD: &str = "if (window.hljs) window.hljs.highlightAll();";

/// Static parts of the preview document: stylesheet, highlight.js assets,
/// and the message listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewShell {
    css: String,
    highlight: Option<HighlightAssets>,
}

impl PreviewShell {
    pub fn new(css: impl Into<String>, highlight: Option<HighlightAssets>) -> Self {
        Self {
            css: css.into(),
            highlight,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.preview_css(), config.highlight.clone())
    }

    /// Full document source with `body` as its content.
    ///
    /// With `listen` set, the document installs the message listener used by
    /// `DeliveryStrategy::Message`; otherwise it highlights its own body once
    /// on load.
    pub fn document(&self, body: &str, listen: bool) -> String {
        let mut out = String::with_capacity(self.css.len() + body.len() + 512);
        self.write_head(&mut out, listen);
        out.push_str(body);
        self.write_footer(&mut out, listen);
        out
    }

    fn write_head(&self, out: &mut String, listen: bool) {
        out.push_str("<!doctype html>\n<html>\n  <head>\n");
        out.push_str("    <meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "    <style>{}</style>", self.css);

        if let Some(assets) = &self.highlight {
            let _ = writeln!(
                out,
                "    <link rel=\"stylesheet\" href=\"{}\">",
                escape_attr(&assets.stylesheet_url())
            );
            for src in assets.script_urls() {
                let _ = writeln!(out, "    <script src=\"{}\"></script>", escape_attr(&src));
            }
        }

        if listen {
            let _ = writeln!(out, "    <script>\n      {}\n    </script>", MESSAGE_LISTENER);
        }

        out.push_str("  </head>\n  <body>");
    }

    fn write_footer(&self, out: &mut String, listen: bool) {
        if !listen && self.highlight.is_some() {
            let _ = write!(out, "<script>{}</script>", HIGHLIGHT_ON_LOAD);
        }
        out.push_str("</body>\n</html>\n");
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Converts markdown and delivers it to the preview surface.
pub struct PreviewRenderer {
    converter: Box<dyn MarkdownConverter>,
    surface: Box<dyn PreviewSurface>,
    shell: PreviewShell,
    strategy: DeliveryStrategy,
    installed: bool,
}

impl PreviewRenderer {
    pub fn new(
        converter: impl MarkdownConverter + 'static,
        surface: impl PreviewSurface + 'static,
        shell: PreviewShell,
        strategy: DeliveryStrategy,
    ) -> Self {
        Self {
            converter: Box::new(converter),
            surface: Box::new(surface),
            shell,
            strategy,
            installed: false,
        }
    }

    pub fn strategy(&self) -> DeliveryStrategy {
        self.strategy
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Install the empty shell. Only the first call does anything.
    pub fn init(&mut self) {
        if self.installed {
            return;
        }
        let listen = self.strategy == DeliveryStrategy::Message;
        self.surface.load_document(&self.shell.document("", listen));
        self.installed = true;
        tracing::debug!(strategy = ?self.strategy, "preview shell installed");
    }

    /// Convert `text` and show it in the preview.
    pub fn render(&mut self, text: &str) {
        self.init();

        let html = {
            let _timing = TimingGuard::new("markdown conversion");
            self.converter.to_html(text)
        };

        match self.strategy {
            DeliveryStrategy::Message => self.surface.post_html(&html),
            DeliveryStrategy::Document => {
                self.surface.load_document(&self.shell.document(&html, false))
            }
        }
        tracing::debug!(source_bytes = text.len(), html_bytes = html.len(), "preview updated");
    }
}
