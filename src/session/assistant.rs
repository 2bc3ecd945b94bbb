//! Contract with the external conversational assistant.

use std::collections::VecDeque;
use std::sync::Mutex;

use base64::Engine as _;
use serde::{Serialize, Serializer};

use crate::foundation::core::Locale;
use crate::foundation::error::{ArborResult, CollaboratorError};
use crate::render::raster::Raster;
use crate::session::messages;

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person drawing.
    User,
    /// The assistant (or a local fallback standing in for it).
    Assistant,
}

/// One entry of the conversation log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Plain text content.
    pub text: String,
    /// Whether the text was generated locally because the assistant failed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl ChatMessage {
    /// Message written by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            fallback: false,
        }
    }

    /// Message from the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            fallback: false,
        }
    }

    /// Locally generated assistant message.
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            fallback: true,
        }
    }
}

/// PNG-encoded combined snapshot.
#[derive(Clone, PartialEq, Eq)]
pub struct SnapshotImage {
    png: Vec<u8>,
}

impl SnapshotImage {
    /// Wrap PNG bytes.
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png }
    }

    /// Encode a raster.
    pub fn from_raster(raster: &Raster) -> ArborResult<Self> {
        Ok(Self {
            png: raster.encode_png()?,
        })
    }

    /// PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` URL as accepted by vision chat APIs.
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

impl std::fmt::Debug for SnapshotImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotImage")
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Serialize for SnapshotImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.data_url())
    }
}

/// Why a request was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Artwork submitted for a gated stage.
    Submission,
    /// Final artwork sent on reaching the summary.
    Closing,
    /// Free text chat, without an image.
    Chat,
}

/// What the assistant needs to know about the active stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageContext {
    /// Stage index.
    pub index: usize,
    /// Localized topic, e.g. "roots (origins and foundations)".
    pub topic: String,
    /// UI language.
    pub locale: Locale,
    /// Whether this is the summary stage.
    pub summary: bool,
}

impl StageContext {
    /// System prompt framing the conversation for this stage.
    pub fn system_prompt(&self) -> String {
        messages::system_prompt(self.locale, &self.topic)
    }
}

/// One call to the assistant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssistantRequest {
    /// Session-unique id.
    pub id: u64,
    /// Why it was issued.
    pub kind: RequestKind,
    /// Stage context.
    pub stage: StageContext,
    /// Conversation so far, oldest first.
    pub conversation: Vec<ChatMessage>,
    /// Combined snapshot, for submissions and the closing request.
    pub image: Option<SnapshotImage>,
}

/// Outcome of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssistantReply {
    /// Id of the request this answers.
    pub request_id: u64,
    /// Kind of the request this answers.
    pub kind: RequestKind,
    /// Assistant text or the failure.
    pub result: Result<String, CollaboratorError>,
}

/// External assistant service.
///
/// Implementations may block; the session runs them on a worker thread.
pub trait Assistant: Send + Sync {
    /// Answer `request` with plain text.
    fn send(&self, request: &AssistantRequest) -> Result<String, CollaboratorError>;
}

/// Assistant that answers locally with short localized encouragement.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineAssistant;

impl Assistant for OfflineAssistant {
    fn send(&self, request: &AssistantRequest) -> Result<String, CollaboratorError> {
        Ok(messages::offline_reply(request))
    }
}

/// Assistant replaying scripted outcomes, recording every request it sees.
///
/// When the script runs out it answers with an empty-script network error.
#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    script: Mutex<VecDeque<Result<String, CollaboratorError>>>,
    seen: Mutex<Vec<AssistantRequest>>,
}

impl ScriptedAssistant {
    /// Assistant answering with `script`, in order.
    pub fn new(script: impl IntoIterator<Item = Result<String, CollaboratorError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Queue one more outcome.
    pub fn push(&self, outcome: Result<String, CollaboratorError>) {
        if let Ok(mut s) = self.script.lock() {
            s.push_back(outcome);
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<AssistantRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Assistant for ScriptedAssistant {
    fn send(&self, request: &AssistantRequest) -> Result<String, CollaboratorError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or_else(|| Err(CollaboratorError::Network("script exhausted".into())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/assistant.rs"]
mod tests;
