//! A complete drawing session: canvas, stage gate and assistant traffic.

use std::time::{Duration, Instant};

use crate::canvas::engine::CanvasEngine;
use crate::foundation::core::Locale;
use crate::foundation::error::ArborResult;
use crate::foundation::notice::{Notice, NoticeKind};
use crate::session::assistant::{AssistantRequest, ChatMessage, SnapshotImage};
use crate::session::controller::{Reflection, StageController};
use crate::session::worker::AssistantWorker;

/// Ties a [`CanvasEngine`] to a [`StageController`] and an [`AssistantWorker`].
///
/// The engine keeps drawing while requests are in flight; only [`DrawingSession::advance`]
/// waits on the outstanding submission. Assistant failures never touch canvas state.
#[derive(Debug)]
pub struct DrawingSession {
    engine: CanvasEngine,
    controller: StageController,
    worker: AssistantWorker,
    notices: Vec<Notice>,
}

impl DrawingSession {
    /// Start a session on the introduction stage.
    pub fn new(
        mut engine: CanvasEngine,
        worker: AssistantWorker,
        locale: Locale,
    ) -> ArborResult<Self> {
        let controller = StageController::new(engine.catalog().clone(), locale);
        engine.enter_stage(controller.stage())?;
        Ok(Self {
            engine,
            controller,
            worker,
            notices: Vec::new(),
        })
    }

    /// Canvas engine.
    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    /// Canvas engine, for drawing input.
    pub fn engine_mut(&mut self) -> &mut CanvasEngine {
        &mut self.engine
    }

    /// Stage controller.
    pub fn controller(&self) -> &StageController {
        &self.controller
    }

    /// Current stage index.
    pub fn stage(&self) -> usize {
        self.controller.stage()
    }

    /// Whether the current stage has been submitted.
    pub fn submitted(&self) -> bool {
        self.controller.submitted()
    }

    /// Conversation so far.
    pub fn conversation(&self) -> &[ChatMessage] {
        self.controller.conversation()
    }

    /// Submit the current artwork. Returns the request id.
    ///
    /// A stroke still being drawn is committed first so the snapshot matches the edit log.
    pub fn submit(&mut self) -> ArborResult<u64> {
        self.engine.commit_drag();
        let image = self.snapshot_image()?;
        let request = self.controller.submit(image)?;
        Ok(self.dispatch(request))
    }

    /// Move to the next stage, entering it on the canvas.
    ///
    /// Replies that already arrived are folded in first. Reaching the summary sends the
    /// closing request.
    pub fn advance(&mut self) -> ArborResult<usize> {
        self.poll();
        let stage = self.controller.advance()?;
        self.engine.enter_stage(stage)?;
        if self.controller.needs_closing() {
            self.send_closing();
        }
        Ok(stage)
    }

    fn send_closing(&mut self) {
        let request = self
            .snapshot_image()
            .and_then(|image| self.controller.closing(image));
        match request {
            Ok(request) => {
                self.dispatch(request);
            }
            Err(e) => {
                tracing::warn!(error = %e, "closing request not sent");
                self.notices
                    .push(Notice::new(NoticeKind::AssistantUnavailable, e.to_string()));
            }
        }
    }

    /// Re-open the current stage's gate. Drawing state is left alone.
    pub fn reedit(&mut self) -> ArborResult<()> {
        self.controller.reedit()
    }

    /// Send a chat message. Returns the request id.
    pub fn say(&mut self, text: &str) -> ArborResult<u64> {
        let request = self.controller.say(text)?;
        Ok(self.dispatch(request))
    }

    /// Record the completion reflection on the summary stage.
    pub fn complete(&mut self, reflection: Reflection) -> ArborResult<()> {
        self.controller.complete(reflection)
    }

    /// Fold arrived replies into the conversation. Returns how many were handled.
    pub fn poll(&mut self) -> usize {
        let replies = self.worker.poll();
        let n = replies.len();
        for reply in replies {
            if let Some(notice) = self.controller.receive(reply) {
                self.notices.push(notice);
            }
        }
        n
    }

    /// Block until no request is in flight or `timeout` elapses.
    pub fn wait_for_replies(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut handled = self.poll();
        while self.worker.in_flight() > 0 {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let Some(reply) = self.worker.recv_timeout(deadline - now) else {
                break;
            };
            handled += 1;
            if let Some(notice) = self.controller.receive(reply) {
                self.notices.push(notice);
            }
        }
        handled
    }

    /// Drain queued notices from the session and the engine.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        let mut out = self.engine.take_notices();
        out.append(&mut self.notices);
        out
    }

    fn snapshot_image(&self) -> ArborResult<SnapshotImage> {
        self.engine.snapshot_png().map(SnapshotImage::from_png)
    }

    fn dispatch(&mut self, request: AssistantRequest) -> u64 {
        let id = request.id;
        self.worker.dispatch(request);
        id
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/drawing.rs"]
mod tests;
