//! The canvas engine: the host's single entry point for drawing.
//!
//! Every mutation of surfaces, caches, text and history goes through this type, on the caller's
//! thread. Undo and redo replay the edit log and re-derive both layers from it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::assets::decode::build_fontdb;
use crate::assets::loader::{AssetLoader, FetchedAsset};
use crate::assets::source::AssetSource;
use crate::assets::store::TemplateLibrary;
use crate::canvas::opts::EngineOpts;
use crate::edit::brush::{Brush, RecentColors};
use crate::edit::history::{DocumentState, EditOp, History};
use crate::edit::input::{DocPointer, PointerEvent, ViewMapping};
use crate::edit::text::{TextItem, TextStore};
use crate::edit::tools::{InteractionController, Tool, ToolAction};
use crate::foundation::color::Rgb8;
use crate::foundation::core::{Point, SurfaceSize, Vec2};
use crate::foundation::error::{ArborError, ArborResult};
use crate::foundation::math::hash_unit;
use crate::foundation::notice::{Notice, NoticeKind};
use crate::render::compositor::LayerCompositor;
use crate::render::raster::Raster;
use crate::render::text::TextRasterizer;
use crate::stage::StageCatalog;

/// Interactive canvas: template library, compositor, history, text and tools.
pub struct CanvasEngine {
    opts: EngineOpts,
    library: TemplateLibrary,
    loader: Option<AssetLoader>,
    compositor: LayerCompositor,
    history: History,
    texts: TextStore,
    controller: InteractionController,
    view: ViewMapping,
    stage: usize,
    shown_stage: usize,
    notices: Vec<Notice>,
}

impl CanvasEngine {
    /// Create an engine, loading system fonts (plus `opts.font_dir`).
    pub fn new(catalog: Arc<StageCatalog>, opts: EngineOpts) -> ArborResult<Self> {
        let fontdb = build_fontdb(opts.font_dir.as_deref());
        Self::with_fontdb(catalog, opts, fontdb)
    }

    /// Create an engine with an explicit font database.
    pub fn with_fontdb(
        catalog: Arc<StageCatalog>,
        opts: EngineOpts,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> ArborResult<Self> {
        opts.validate()?;
        catalog.validate()?;
        let size = opts.surface_size()?;
        let text = TextRasterizer::new(fontdb.clone(), opts.text_font_family.clone());
        let compositor =
            LayerCompositor::new(size, opts.document, opts.compositor_opts(), text)?;
        let history = match opts.history_limit {
            Some(limit) => History::with_limit(limit),
            None => History::new(),
        };
        let mut engine = Self {
            view: ViewMapping::new(opts.document, size),
            library: TemplateLibrary::new(catalog, fontdb),
            loader: None,
            compositor,
            history,
            texts: TextStore::new(),
            controller: InteractionController::new(),
            stage: 0,
            shown_stage: 0,
            notices: Vec::new(),
            opts,
        };
        engine.compositor.redraw_base(&engine.library, None);
        Ok(engine)
    }

    /// Options the engine was built with.
    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    /// Stage catalog.
    pub fn catalog(&self) -> &Arc<StageCatalog> {
        self.library.catalog()
    }

    /// Template library.
    pub fn library(&self) -> &TemplateLibrary {
        &self.library
    }

    /// Layer compositor (read-only).
    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    // ---- assets -------------------------------------------------------------------------------

    /// Fetch and install every template asset synchronously.
    ///
    /// Failures become notices; whatever loaded is drawn.
    pub fn load_templates(&mut self, source: &dyn AssetSource) {
        let notices = self.library.load_all(source);
        self.notices.extend(notices);
        self.compositor.invalidate_assets();
        self.rebuild();
    }

    /// Start fetching every pending asset on a background thread.
    ///
    /// Results are installed by [`CanvasEngine::poll_assets`].
    pub fn load_templates_async(&mut self, source: Arc<dyn AssetSource>) {
        let requests = self
            .library
            .requests()
            .into_iter()
            .filter(|(k, _)| self.library.pending().contains(k))
            .collect();
        self.loader = Some(AssetLoader::spawn(source, requests));
    }

    /// Install whatever the background loader has fetched. Returns the number of assets handled.
    pub fn poll_assets(&mut self) -> usize {
        let Some(loader) = self.loader.as_mut() else {
            return 0;
        };
        let fetched = loader.drain();
        let done = loader.is_done();
        if done {
            self.loader = None;
        }
        self.install_fetched(fetched)
    }

    /// Block until the background loader finishes or `timeout` elapses.
    pub fn wait_for_assets(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut handled = 0;
        while let Some(loader) = self.loader.as_mut() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let mut batch: Vec<_> = loader.recv_timeout(deadline - now).into_iter().collect();
            batch.extend(loader.drain());
            if loader.is_done() {
                self.loader = None;
            }
            if batch.is_empty() {
                break;
            }
            handled += self.install_fetched(batch);
        }
        handled
    }

    /// Whether a background load is still running.
    pub fn is_loading(&self) -> bool {
        self.loader.is_some()
    }

    fn install_fetched(&mut self, fetched: Vec<FetchedAsset>) -> usize {
        let n = fetched.len();
        if n == 0 {
            return 0;
        }
        for f in fetched {
            if let Err(e) = self.library.install(f.key, f.bytes) {
                self.notices
                    .push(Notice::new(NoticeKind::AssetUnavailable, e.to_string()));
            }
        }
        self.sync_base();
        n
    }

    // ---- stages -------------------------------------------------------------------------------

    /// Stage edits are recorded under.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Stage whose guide is displayed (follows the history cursor).
    pub fn shown_stage(&self) -> usize {
        self.shown_stage
    }

    /// Make `index` the active stage and record the entry.
    pub fn enter_stage(&mut self, index: usize) -> ArborResult<()> {
        if index >= self.catalog().len() {
            return Err(ArborError::validation(format!("unknown stage {index}")));
        }
        self.commit_drag();
        // Pending text belongs to the stage it was placed on.
        if self.texts.pending().is_some() {
            self.confirm_text();
        }
        self.stage = index;
        self.history.record(index, EditOp::StageEntered);
        tracing::debug!(stage = index, "stage entered");
        self.rebuild();
        Ok(())
    }

    // ---- tools --------------------------------------------------------------------------------

    /// Active tool.
    pub fn tool(&self) -> Tool {
        self.controller.tool()
    }

    /// Select a tool. A stroke in progress is committed first.
    pub fn set_tool(&mut self, tool: Tool) {
        let actions = self.controller.set_tool(tool);
        self.apply_actions(actions);
    }

    /// Current brush.
    pub fn brush(&self) -> &Brush {
        self.controller.brush()
    }

    /// Recently used colors.
    pub fn recent_colors(&self) -> &RecentColors {
        self.controller.recent_colors()
    }

    /// Select the brush/fill/text color.
    pub fn set_color(&mut self, color: Rgb8) {
        self.controller.set_color(color);
    }

    /// Set the brush width in document units (clamped to 1..=50).
    pub fn set_brush_width(&mut self, width: f64) {
        self.controller.set_width(width);
    }

    /// Set the brush opacity (clamped to 0..=1).
    pub fn set_brush_opacity(&mut self, opacity: f32) {
        self.controller.set_opacity(opacity);
    }

    /// Feed one pointer event, in display pixels.
    pub fn pointer(&mut self, ev: PointerEvent) {
        let ev = self.view.map(ev);
        let actions = self.controller.handle(ev, &self.texts);
        self.apply_actions(actions);
    }

    /// Finish a drag in progress as if the pointer left the canvas.
    pub(crate) fn commit_drag(&mut self) {
        if self.controller.is_dragging() {
            let actions = self.controller.handle(DocPointer::Leave, &self.texts);
            self.apply_actions(actions);
        }
    }

    fn apply_actions(&mut self, actions: Vec<ToolAction>) {
        for action in actions {
            match action {
                ToolAction::PreviewStroke => self.redraw_user(),
                ToolAction::CommitStroke(stroke) => {
                    self.compositor.append_stroke(&stroke);
                    self.history.record(self.stage, EditOp::StrokeAdded(stroke));
                    self.settle_shown_stage();
                    self.redraw_user();
                }
                ToolAction::Fill(color) => {
                    self.fill_current_part(color);
                }
                ToolAction::MoveText(delta) => {
                    if self.texts.move_pending(delta) {
                        self.redraw_user();
                    }
                }
            }
        }
    }

    /// Fill the active stage's part with `color`.
    ///
    /// Returns `false` (and records nothing) on stages without a part or when the recolor fails;
    /// a failure also queues a notice.
    pub fn fill_current_part(&mut self, color: Rgb8) -> bool {
        let Some(part) = self.catalog().part_of(self.stage) else {
            return false;
        };
        if let Err(e) = self.compositor.apply_fill(&self.library, part, color) {
            tracing::warn!(part, error = %e, "fill failed");
            self.notices
                .push(Notice::new(NoticeKind::FillFailed, e.to_string()));
            return false;
        }
        self.history
            .record(self.stage, EditOp::PartRecolored { part, color });
        tracing::debug!(part, color = %color, "part filled");
        if self.shown_stage != self.stage {
            self.rebuild();
        } else {
            self.compositor.redraw_base(&self.library, Some(part));
        }
        true
    }

    // ---- text ---------------------------------------------------------------------------------

    /// Text items, the pending one included.
    pub fn texts(&self) -> &TextStore {
        &self.texts
    }

    /// Create a pending text item near the document center.
    ///
    /// Rejected while another item is pending or when `content` is blank.
    pub fn place_text(&mut self, content: &str) -> ArborResult<()> {
        let size = self.opts.text_font_size;
        let position = self.text_position(content, size);
        let color = self.brush().color();
        self.texts.place(content, position, color, size)?;
        self.set_tool(Tool::Text);
        self.redraw_user();
        Ok(())
    }

    fn text_position(&self, content: &str, font_size: f64) -> Point {
        let doc = self.opts.document;
        let counter = self.texts.placements();
        let jitter = Vec2::new(
            hash_unit(self.opts.seed, counter, 0),
            hash_unit(self.opts.seed, counter, 1),
        ) * self.opts.text_jitter;
        let half = TextItem::box_size(content, font_size) * 0.5;
        let p = doc.center() - half + jitter;
        Point::new(
            p.x.clamp(0.0, (doc.width - half.x * 2.0).max(0.0)),
            p.y.clamp(0.0, (doc.height - half.y * 2.0).max(0.0)),
        )
    }

    /// Confirm the pending text item and record it. Returns the tool to pen.
    pub fn confirm_text(&mut self) -> bool {
        self.commit_drag();
        let Some(item) = self.texts.confirm() else {
            return false;
        };
        self.history.record(self.stage, EditOp::TextConfirmed(item));
        self.settle_shown_stage();
        self.set_tool(Tool::Pen);
        self.redraw_user();
        true
    }

    /// Drop the pending text item without recording. Returns the tool to pen.
    pub fn cancel_text(&mut self) -> bool {
        self.commit_drag();
        if self.texts.cancel().is_none() {
            return false;
        }
        self.set_tool(Tool::Pen);
        self.redraw_user();
        true
    }

    // ---- history ------------------------------------------------------------------------------

    /// Edit log.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether undo would change anything.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo would change anything.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one edit. No-op at the first entry.
    pub fn undo(&mut self) -> bool {
        self.commit_drag();
        if !self.history.undo() {
            return false;
        }
        self.rebuild();
        true
    }

    /// Step forward one edit. No-op at the last entry.
    pub fn redo(&mut self) -> bool {
        self.commit_drag();
        if !self.history.redo() {
            return false;
        }
        self.rebuild();
        true
    }

    /// Document content at the history cursor.
    pub fn document(&self) -> DocumentState {
        self.history.replay()
    }

    // ---- surfaces -----------------------------------------------------------------------------

    /// Display surface size.
    pub fn size(&self) -> SurfaceSize {
        self.compositor.size()
    }

    /// Reallocate surfaces at a new display size and re-derive their content.
    ///
    /// History is stored in document units, so it is left untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> ArborResult<()> {
        let size = SurfaceSize::new(width, height)?;
        self.compositor.resize(size)?;
        self.view = ViewMapping::new(self.opts.document, size);
        self.opts.width = width;
        self.opts.height = height;
        self.rebuild();
        Ok(())
    }

    /// Base then user surface, flattened.
    pub fn composite(&self) -> ArborResult<Raster> {
        self.compositor.combined()
    }

    /// Combined raster for export or submission.
    pub fn snapshot(&self) -> ArborResult<Raster> {
        self.composite()
    }

    /// Combined raster encoded as PNG.
    pub fn snapshot_png(&self) -> ArborResult<Vec<u8>> {
        self.snapshot()?.encode_png()
    }

    /// Base surface only.
    pub fn base_raster(&self) -> Raster {
        self.compositor.base_raster()
    }

    /// User surface only.
    pub fn user_raster(&self) -> Raster {
        self.compositor.user_raster()
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ---- derivation ---------------------------------------------------------------------------

    fn settle_shown_stage(&mut self) {
        if self.shown_stage != self.stage {
            self.shown_stage = self.stage;
            self.sync_base();
        }
    }

    fn sync_base(&mut self) {
        let state = self.history.replay();
        let notices = self.compositor.sync_fills(&self.library, &state.fills);
        self.notices.extend(notices);
        let active = self.catalog().part_of(self.shown_stage);
        self.compositor.redraw_base(&self.library, active);
    }

    fn rebuild(&mut self) {
        let state = self.history.replay();
        self.shown_stage = state.stage.unwrap_or(self.stage);

        let notices = self.compositor.sync_fills(&self.library, &state.fills);
        self.notices.extend(notices);
        let active = self.catalog().part_of(self.shown_stage);
        self.compositor.redraw_base(&self.library, active);

        self.compositor.redraw_strokes(&state.strokes);
        self.texts.restore(&state.texts);
        self.redraw_user();
    }

    fn redraw_user(&mut self) {
        let preview = self.controller.in_progress();
        if let Err(e) = self.compositor.redraw_user(self.texts.items(), preview) {
            tracing::warn!(error = %e, "text layer could not be drawn");
        }
    }
}

impl std::fmt::Debug for CanvasEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasEngine")
            .field("stage", &self.stage)
            .field("shown_stage", &self.shown_stage)
            .field("tool", &self.controller.tool())
            .field("history_len", &self.history.len())
            .field("history_step", &self.history.step())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/engine.rs"]
mod tests;
