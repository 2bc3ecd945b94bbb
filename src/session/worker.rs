use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::foundation::error::CollaboratorError;
use crate::session::assistant::{Assistant, AssistantReply, AssistantRequest};

enum Mode {
    Inline(Arc<dyn Assistant>),
    Threaded {
        tx: Option<mpsc::Sender<AssistantRequest>>,
        rx: mpsc::Receiver<AssistantReply>,
        handle: Option<JoinHandle<()>>,
    },
}

/// Dispatches assistant requests without blocking the caller.
///
/// The threaded mode runs every request on one background thread, in order. The inline mode
/// answers during [`AssistantWorker::dispatch`] and is meant for tests and headless hosts.
pub struct AssistantWorker {
    mode: Mode,
    ready: Vec<AssistantReply>,
    in_flight: usize,
}

impl AssistantWorker {
    /// Background-thread dispatcher.
    pub fn threaded(assistant: Arc<dyn Assistant>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<AssistantRequest>();
        let (rep_tx, rep_rx) = mpsc::channel::<AssistantReply>();
        let handle = std::thread::spawn(move || {
            for request in req_rx {
                let reply = answer(assistant.as_ref(), &request);
                if rep_tx.send(reply).is_err() {
                    return;
                }
            }
        });
        Self {
            mode: Mode::Threaded {
                tx: Some(req_tx),
                rx: rep_rx,
                handle: Some(handle),
            },
            ready: Vec::new(),
            in_flight: 0,
        }
    }

    /// Same-thread dispatcher.
    pub fn inline(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            mode: Mode::Inline(assistant),
            ready: Vec::new(),
            in_flight: 0,
        }
    }

    /// Hand `request` to the assistant.
    ///
    /// If the worker thread has gone away the request is answered at once with
    /// [`CollaboratorError::Disconnected`].
    pub fn dispatch(&mut self, request: AssistantRequest) {
        self.in_flight += 1;
        tracing::debug!(request = request.id, kind = ?request.kind, "assistant request dispatched");
        match &mut self.mode {
            Mode::Inline(assistant) => {
                let reply = answer(assistant.as_ref(), &request);
                self.ready.push(reply);
            }
            Mode::Threaded { tx, .. } => {
                let Some(sender) = tx.as_ref() else {
                    self.ready.push(disconnected(&request));
                    return;
                };
                if let Err(mpsc::SendError(request)) = sender.send(request) {
                    tracing::warn!(request = request.id, "assistant worker is gone");
                    self.ready.push(disconnected(&request));
                    tx.take();
                }
            }
        }
    }

    /// Replies that have arrived, without blocking.
    pub fn poll(&mut self) -> Vec<AssistantReply> {
        let mut out = std::mem::take(&mut self.ready);
        if let Mode::Threaded { rx, .. } = &self.mode {
            out.extend(rx.try_iter());
        }
        self.in_flight = self.in_flight.saturating_sub(out.len());
        out
    }

    /// Block up to `timeout` for the next reply.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<AssistantReply> {
        let got = if self.ready.is_empty() {
            match &self.mode {
                Mode::Inline(_) => None,
                Mode::Threaded { rx, .. } => rx.recv_timeout(timeout).ok(),
            }
        } else {
            Some(self.ready.remove(0))
        };
        if got.is_some() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        got
    }

    /// Requests dispatched but not yet handed back.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether requests run on a background thread.
    pub fn is_threaded(&self) -> bool {
        matches!(self.mode, Mode::Threaded { .. })
    }
}

impl std::fmt::Debug for AssistantWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantWorker")
            .field("threaded", &self.is_threaded())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl Drop for AssistantWorker {
    fn drop(&mut self) {
        if let Mode::Threaded { tx, handle, .. } = &mut self.mode {
            // Closing the request channel lets the thread finish its queue and exit.
            tx.take();
            if let Some(h) = handle.take() {
                let _ = h.join();
            }
        }
    }
}

fn answer(assistant: &dyn Assistant, request: &AssistantRequest) -> AssistantReply {
    // A panicking assistant must still resolve its request, or the stage gate never reopens.
    let result = panic::catch_unwind(AssertUnwindSafe(|| assistant.send(request)))
        .unwrap_or_else(|payload| {
            tracing::error!(
                request = request.id,
                panic = panic_message(payload.as_ref()),
                "assistant panicked"
            );
            Err(CollaboratorError::Disconnected)
        });
    if let Err(e) = &result {
        tracing::warn!(request = request.id, error = %e, "assistant request failed");
    }
    AssistantReply {
        request_id: request.id,
        kind: request.kind,
        result,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn disconnected(request: &AssistantRequest) -> AssistantReply {
    AssistantReply {
        request_id: request.id,
        kind: request.kind,
        result: Err(CollaboratorError::Disconnected),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/worker.rs"]
mod tests;
