//! Browser DOM layer for markdown-online.
//!
//! This crate implements the collaborator traits of `markdown-online-core`
//! against the DOM. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `timer`: `setTimeout`-backed `Timer`
//! - `storage`: `localStorage`-backed `KeyValueStore`
//! - `preview`: sandboxed `<iframe>` `PreviewSurface`
//! - `editor`: `<textarea>` `EditorWidget` with composition tracking
//! - `clipboard`: image extraction from paste events
//! - `split`: pointer, media query and resize observer wiring for the divider
//!
//! # Re-exports
//!
//! This crate re-exports `markdown-online-core` for convenience, so consumers
//! only need to depend on `markdown-online-browser`.

// Re-export core crate
pub use markdown_online_core;
pub use markdown_online_core::*;

pub mod clipboard;
pub mod dom;
pub mod editor;
pub mod preview;
pub mod split;
pub mod storage;
pub mod timer;

pub use editor::TextareaEditor;
pub use preview::IframeSurface;
pub use split::SplitPane;
pub use storage::LocalStore;
pub use timer::BrowserTimer;
