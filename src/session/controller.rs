//! Stage progression, the submission gate and the conversation log.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Locale;
use crate::foundation::error::{ArborError, ArborResult, CollaboratorError};
use crate::foundation::notice::{Notice, NoticeKind};
use crate::session::assistant::{
    AssistantReply, AssistantRequest, ChatMessage, RequestKind, SnapshotImage, StageContext,
};
use crate::session::messages;
use crate::stage::StageCatalog;

/// Answer to the closing "did this help?" question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reflection {
    /// It helped.
    Yes,
    /// It did not help.
    No,
    /// It helped a little.
    ALittle,
}

impl Reflection {
    /// Localized label, as the user would have said it.
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Yes, Locale::En) => "Yes",
            (Self::Yes, Locale::Zh) => "是的",
            (Self::No, Locale::En) => "No",
            (Self::No, Locale::Zh) => "没有",
            (Self::ALittle, Locale::En) => "A little",
            (Self::ALittle, Locale::Zh) => "有一点",
        }
    }
}

/// Session state machine over the stage catalog.
///
/// Stage `0` and the summary are never gated. Every stage in between must be submitted before
/// [`StageController::advance`] succeeds, and only one submission may be outstanding.
#[derive(Debug)]
pub struct StageController {
    catalog: Arc<StageCatalog>,
    locale: Locale,
    stage: usize,
    submitted: bool,
    outstanding: Option<u64>,
    pending: BTreeSet<u64>,
    closing_sent: bool,
    reflection: Option<Reflection>,
    conversation: Vec<ChatMessage>,
    next_id: u64,
}

impl StageController {
    /// Controller positioned on the introduction stage.
    pub fn new(catalog: Arc<StageCatalog>, locale: Locale) -> Self {
        let mut this = Self {
            catalog,
            locale,
            stage: 0,
            submitted: false,
            outstanding: None,
            pending: BTreeSet::new(),
            closing_sent: false,
            reflection: None,
            conversation: Vec::new(),
            next_id: 1,
        };
        this.push_instruction();
        this
    }

    /// Stage catalog.
    pub fn catalog(&self) -> &Arc<StageCatalog> {
        &self.catalog
    }

    /// UI language.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch the UI language. Earlier messages are left as they were.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Current stage index.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Whether the current stage has been submitted.
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Id of the submission awaiting a reply.
    pub fn outstanding(&self) -> Option<u64> {
        self.outstanding
    }

    /// Whether any request (submission, closing or chat) awaits a reply.
    pub fn is_waiting(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Whether the current stage requires a submission.
    pub fn is_gated(&self) -> bool {
        self.catalog.is_gated(self.stage)
    }

    /// Whether the current stage is the summary.
    pub fn is_summary(&self) -> bool {
        self.stage == self.catalog.summary_index()
    }

    /// Whether [`StageController::advance`] would succeed.
    pub fn can_advance(&self) -> bool {
        self.gate_check().is_ok()
    }

    /// Whether the summary has been reached and the closing request not yet issued.
    pub fn needs_closing(&self) -> bool {
        self.is_summary() && !self.closing_sent
    }

    /// Reflection given on the summary stage.
    pub fn reflection(&self) -> Option<Reflection> {
        self.reflection
    }

    /// Conversation so far, oldest first.
    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    /// Submit the artwork of the current gated stage.
    pub fn submit(&mut self, image: SnapshotImage) -> ArborResult<AssistantRequest> {
        if !self.is_gated() {
            return Err(ArborError::gate(format!(
                "stage {} does not take submissions",
                self.stage
            )));
        }
        if let Some(id) = self.outstanding {
            return Err(ArborError::gate(format!("submission {id} is still pending")));
        }
        if self.submitted {
            return Err(ArborError::gate(format!(
                "stage {} is already submitted",
                self.stage
            )));
        }
        let topic = self.catalog.topic(self.stage, self.locale);
        self.conversation
            .push(ChatMessage::user(messages::submission_text(self.locale, &topic)));
        let request = self.request(RequestKind::Submission, Some(image));
        self.submitted = true;
        self.outstanding = Some(request.id);
        tracing::debug!(stage = self.stage, request = request.id, "stage submitted");
        Ok(request)
    }

    /// Move to the next stage. Returns the new stage index.
    pub fn advance(&mut self) -> ArborResult<usize> {
        self.gate_check()?;
        self.stage += 1;
        self.submitted = false;
        self.push_instruction();
        tracing::debug!(stage = self.stage, "stage advanced");
        Ok(self.stage)
    }

    fn gate_check(&self) -> ArborResult<()> {
        if self.is_summary() {
            return Err(ArborError::gate("already on the summary stage"));
        }
        if let Some(id) = self.outstanding {
            return Err(ArborError::gate(format!("submission {id} is still pending")));
        }
        if self.is_gated() && !self.submitted {
            return Err(ArborError::gate(format!(
                "stage {} must be submitted first",
                self.stage
            )));
        }
        Ok(())
    }

    /// Re-open the gate of the current stage so it can be edited and submitted again.
    pub fn reedit(&mut self) -> ArborResult<()> {
        if self.is_summary() {
            return Err(ArborError::gate("the summary stage cannot be re-edited"));
        }
        if let Some(id) = self.outstanding {
            return Err(ArborError::gate(format!("submission {id} is still pending")));
        }
        self.submitted = false;
        tracing::debug!(stage = self.stage, "stage reopened");
        Ok(())
    }

    /// Closing request carrying the final artwork. Issued once, on the summary stage.
    pub fn closing(&mut self, image: SnapshotImage) -> ArborResult<AssistantRequest> {
        if !self.is_summary() {
            return Err(ArborError::gate("closing is only sent from the summary stage"));
        }
        if self.closing_sent {
            return Err(ArborError::gate("closing request already sent"));
        }
        self.conversation
            .push(ChatMessage::user(messages::closing_text(self.locale)));
        self.closing_sent = true;
        Ok(self.request(RequestKind::Closing, Some(image)))
    }

    /// Free-text chat message from the user.
    pub fn say(&mut self, text: &str) -> ArborResult<AssistantRequest> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ArborError::validation("chat message is empty"));
        }
        self.conversation.push(ChatMessage::user(text));
        Ok(self.request(RequestKind::Chat, None))
    }

    /// Record the completion reflection on the summary stage.
    pub fn complete(&mut self, reflection: Reflection) -> ArborResult<()> {
        if !self.is_summary() {
            return Err(ArborError::gate("reflection is only asked on the summary stage"));
        }
        if self.reflection.is_some() {
            return Err(ArborError::validation("reflection already given"));
        }
        self.reflection = Some(reflection);
        self.conversation
            .push(ChatMessage::user(reflection.label(self.locale)));
        self.conversation
            .push(ChatMessage::assistant(messages::reflection_ack(self.locale)));
        Ok(())
    }

    /// Fold an assistant reply into the log.
    ///
    /// Failures become a localized fallback message plus a notice. Replies to unknown requests
    /// are ignored.
    pub fn receive(&mut self, reply: AssistantReply) -> Option<Notice> {
        if !self.pending.remove(&reply.request_id) {
            tracing::warn!(request = reply.request_id, "reply to unknown request dropped");
            return None;
        }
        if self.outstanding == Some(reply.request_id) {
            self.outstanding = None;
        }
        match reply.result {
            Ok(text) if !text.trim().is_empty() => {
                self.conversation.push(ChatMessage::assistant(text));
                None
            }
            Ok(_) => {
                let error = CollaboratorError::Malformed("empty reply".to_string());
                Some(self.fall_back(reply.kind, &error))
            }
            Err(error) => Some(self.fall_back(reply.kind, &error)),
        }
    }

    fn fall_back(&mut self, kind: RequestKind, error: &CollaboratorError) -> Notice {
        self.conversation
            .push(ChatMessage::fallback(messages::fallback(self.locale, kind, error)));
        Notice::new(NoticeKind::AssistantUnavailable, error.to_string())
    }

    fn request(&mut self, kind: RequestKind, image: Option<SnapshotImage>) -> AssistantRequest {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(id);
        AssistantRequest {
            id,
            kind,
            stage: StageContext {
                index: self.stage,
                topic: self.catalog.topic(self.stage, self.locale),
                locale: self.locale,
                summary: self.is_summary(),
            },
            conversation: self.conversation.clone(),
            image,
        }
    }

    fn push_instruction(&mut self) {
        let text = self
            .catalog
            .stage(self.stage)
            .map(|s| s.instruction.get(self.locale).to_string())
            .unwrap_or_default();
        if !text.is_empty() {
            self.conversation.push(ChatMessage::assistant(text));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
