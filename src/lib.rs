//! Arbor is an interactive canvas engine for guided, stage-based expressive drawing.
//!
//! A session walks through an ordered list of stages. Each stage owns one part of a vector
//! template, which the user traces, paints over and recolors:
//!
//! - Build a [`StageCatalog`] (or use [`StageCatalog::tree_of_life`])
//! - Create a [`CanvasEngine`] and load templates from an [`AssetSource`]
//! - Feed [`PointerEvent`]s, pick [`Tool`]s, undo and redo
//! - Wrap it in a [`DrawingSession`] to gate stages on assistant submissions
//!
//! Rendering is CPU only. The base surface (template, guides, fills) and the user surface
//! (strokes, text) are kept apart, and history is an edit log replayed on undo.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Template assets: sources, loading and the library.
pub mod assets;
/// The canvas engine and its options.
pub mod canvas;
/// Brushes, strokes, text, tools and history.
pub mod edit;
/// Shared value types and errors.
pub mod foundation;
/// CPU rasterization and layer compositing.
pub mod render;
/// Stage gate and assistant conversation.
pub mod session;
/// Stage descriptors and the catalog.
pub mod stage;

pub use crate::assets::source::{AssetKey, AssetSource, DirAssetSource, MemoryAssetSource, Variant};
pub use crate::assets::store::TemplateLibrary;
pub use crate::canvas::engine::CanvasEngine;
pub use crate::canvas::opts::EngineOpts;
pub use crate::edit::brush::{Brush, RecentColors};
pub use crate::edit::history::{DocumentState, EditOp, History, HistoryEntry};
pub use crate::edit::input::PointerEvent;
pub use crate::edit::stroke::{Stroke, StrokeKind};
pub use crate::edit::text::TextItem;
pub use crate::edit::tools::Tool;
pub use crate::foundation::color::Rgb8;
pub use crate::foundation::core::{DocumentSize, Locale, LocalizedText, Point, SurfaceSize, Vec2};
pub use crate::foundation::error::{ArborError, ArborResult, CollaboratorError};
pub use crate::foundation::notice::{Notice, NoticeKind};
pub use crate::render::raster::Raster;
pub use crate::session::assistant::{
    Assistant, AssistantReply, AssistantRequest, ChatMessage, OfflineAssistant, RequestKind,
    Role, ScriptedAssistant, SnapshotImage, StageContext,
};
pub use crate::session::controller::{Reflection, StageController};
pub use crate::session::drawing::DrawingSession;
pub use crate::session::worker::AssistantWorker;
pub use crate::stage::{Stage, StageCatalog, TemplatePart};
