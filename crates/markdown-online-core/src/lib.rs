//! markdown-online-core: editor/preview synchronization without browser dependencies.
//!
//! This crate provides:
//! - `Timer` trait and `Debouncer` for collapsing bursts of edits
//! - `PersistenceStore` over any `KeyValueStore` backend
//! - `PreviewRenderer` delivering converted HTML into an isolated `PreviewSurface`
//! - `ChangePipeline` tying editor changes to render + persist
//! - `ResizeController` state machine for the split-pane divider
//!
//! Browser implementations of the collaborator traits live in
//! `markdown-online-browser`.

pub mod config;
pub mod context;
pub mod debounce;
pub mod error;
pub mod paste;
pub mod perf;
pub mod pipeline;
pub mod preview;
pub mod resize;
pub mod storage;
pub mod timer;

pub use config::{DeliveryStrategy, EditorConfig, ElementIds, HighlightAssets};
pub use context::{AppContext, EditorWidget};
pub use debounce::Debouncer;
pub use error::{Error, Result, StoreError};
pub use paste::{encode_data_url, image_markdown, insert_at_utf16};
pub use pipeline::{ChangePipeline, DocumentChange};
pub use preview::{ComrakConverter, MarkdownConverter, PreviewRenderer, PreviewShell, PreviewSurface};
pub use resize::{
    DragHost, DragState, PaneSize, PointerPosition, ResizeController, ScreenClass,
    format_dimensions,
};
pub use smol_str::SmolStr;
pub use storage::{CACHE_KEY, KeyValueStore, MemoryStore, PersistenceStore};
pub use timer::{ManualClock, ManualTimer, Timer};
