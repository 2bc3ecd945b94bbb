use super::*;
use crate::session::assistant::Role;

#[path = "../fixtures.rs"]
mod fixtures;

fn controller() -> StageController {
    StageController::new(fixtures::catalog(), Locale::En)
}

fn image() -> SnapshotImage {
    SnapshotImage::from_png(vec![1, 2, 3])
}

fn ok_reply(req: &AssistantRequest, text: &str) -> AssistantReply {
    AssistantReply {
        request_id: req.id,
        kind: req.kind,
        result: Ok(text.to_string()),
    }
}

fn err_reply(req: &AssistantRequest, e: CollaboratorError) -> AssistantReply {
    AssistantReply {
        request_id: req.id,
        kind: req.kind,
        result: Err(e),
    }
}

#[test]
fn starts_on_intro_with_its_instruction() {
    let c = controller();
    assert_eq!(c.stage(), 0);
    assert!(!c.is_gated());
    assert!(c.can_advance());
    assert_eq!(c.conversation(), &[ChatMessage::assistant("Do stage 0")]);
}

#[test]
fn intro_is_not_gated_and_takes_no_submission() {
    let mut c = controller();
    assert!(matches!(c.submit(image()), Err(ArborError::Gate(_))));
    assert_eq!(c.advance().unwrap(), 1);
    assert!(!c.submitted());
    assert_eq!(c.conversation().last().unwrap().text, "Do stage 1");
}

#[test]
fn gated_stage_rejects_advance_until_submitted() {
    let mut c = controller();
    c.advance().unwrap();
    let err = c.advance().unwrap_err();
    assert!(matches!(err, ArborError::Gate(_)));
    assert_eq!(c.stage(), 1);

    let req = c.submit(image()).unwrap();
    assert_eq!(req.kind, RequestKind::Submission);
    assert_eq!(req.stage.index, 1);
    assert!(req.image.is_some());
    assert_eq!(req.conversation.last().unwrap().role, Role::User);
    assert!(c.submitted());
    assert_eq!(c.outstanding(), Some(req.id));

    // Blocked while the reply is outstanding.
    assert!(c.advance().is_err());
    assert!(c.receive(ok_reply(&req, "Lovely roots.")).is_none());
    assert_eq!(c.outstanding(), None);
    assert_eq!(c.conversation().last().unwrap(), &ChatMessage::assistant("Lovely roots."));

    assert_eq!(c.advance().unwrap(), 2);
    assert!(!c.submitted());
}

#[test]
fn second_submission_is_debounced() {
    let mut c = controller();
    c.advance().unwrap();
    let req = c.submit(image()).unwrap();
    assert!(matches!(c.submit(image()), Err(ArborError::Gate(_))));
    c.receive(ok_reply(&req, "ok"));
    // Submitted stages need a re-edit before another submission.
    assert!(c.submit(image()).is_err());
    c.reedit().unwrap();
    assert!(c.submit(image()).is_ok());
}

#[test]
fn collaborator_failure_falls_back_and_still_opens_the_gate() {
    let mut c = controller();
    c.advance().unwrap();
    let req = c.submit(image()).unwrap();
    let notice = c
        .receive(err_reply(&req, CollaboratorError::Network("timeout".into())))
        .unwrap();
    assert_eq!(notice.kind, NoticeKind::AssistantUnavailable);
    let last = c.conversation().last().unwrap();
    assert!(last.fallback);
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(c.advance().unwrap(), 2);
}

#[test]
fn empty_reply_is_treated_as_malformed() {
    let mut c = controller();
    let req = c.say("hello").unwrap();
    let notice = c.receive(ok_reply(&req, "   ")).unwrap();
    assert!(notice.detail.contains("malformed"));
    assert!(c.conversation().last().unwrap().fallback);
}

#[test]
fn reedit_reopens_the_gate() {
    let mut c = controller();
    c.advance().unwrap();
    let req = c.submit(image()).unwrap();
    assert!(c.reedit().is_err());
    c.receive(ok_reply(&req, "ok"));
    c.reedit().unwrap();
    assert!(!c.submitted());
    assert!(!c.can_advance());
}

#[test]
fn reaching_summary_needs_one_closing_request() {
    let mut c = controller();
    c.advance().unwrap();
    for _ in 0..2 {
        let req = c.submit(image()).unwrap();
        c.receive(ok_reply(&req, "ok"));
        c.advance().unwrap();
    }
    assert!(c.is_summary());
    assert!(!c.is_gated());
    assert!(c.needs_closing());
    assert!(c.advance().is_err());
    assert!(c.reedit().is_err());

    let closing = c.closing(image()).unwrap();
    assert_eq!(closing.kind, RequestKind::Closing);
    assert!(closing.stage.summary);
    assert!(!c.needs_closing());
    assert!(c.closing(image()).is_err());
    assert!(c.is_waiting());
    c.receive(ok_reply(&closing, "Beautiful tree."));
    assert!(!c.is_waiting());
}

#[test]
fn closing_is_refused_before_summary() {
    let mut c = controller();
    assert!(matches!(c.closing(image()), Err(ArborError::Gate(_))));
}

#[test]
fn completion_reflection_only_on_summary_and_once() {
    let mut c = controller();
    assert!(c.complete(Reflection::Yes).is_err());
    c.advance().unwrap();
    for _ in 0..2 {
        let req = c.submit(image()).unwrap();
        c.receive(ok_reply(&req, "ok"));
        c.advance().unwrap();
    }
    c.complete(Reflection::ALittle).unwrap();
    assert_eq!(c.reflection(), Some(Reflection::ALittle));
    let log = c.conversation();
    assert_eq!(log[log.len() - 2], ChatMessage::user("A little"));
    assert!(c.complete(Reflection::No).is_err());
}

#[test]
fn chat_is_not_gated_by_submissions() {
    let mut c = controller();
    c.advance().unwrap();
    let sub = c.submit(image()).unwrap();
    let chat = c.say("  can I use blue?  ").unwrap();
    assert_eq!(chat.kind, RequestKind::Chat);
    assert!(chat.image.is_none());
    assert_ne!(chat.id, sub.id);
    assert_eq!(chat.conversation.last().unwrap().text, "can I use blue?");
    assert!(c.say("   ").is_err());

    // A chat reply does not clear the outstanding submission.
    c.receive(ok_reply(&chat, "Sure."));
    assert_eq!(c.outstanding(), Some(sub.id));
}

#[test]
fn unknown_and_duplicate_replies_are_ignored() {
    let mut c = controller();
    let req = c.say("hi").unwrap();
    let before = c.conversation().len();
    let stray = AssistantReply {
        request_id: 99,
        kind: RequestKind::Chat,
        result: Ok("??".to_string()),
    };
    assert!(c.receive(stray).is_none());
    assert_eq!(c.conversation().len(), before);
    c.receive(ok_reply(&req, "hello"));
    c.receive(ok_reply(&req, "hello again"));
    assert_eq!(c.conversation().len(), before + 1);
}

#[test]
fn locale_changes_new_messages() {
    let mut c = controller();
    c.set_locale(Locale::Zh);
    let req = c.say("你好").unwrap();
    assert_eq!(req.stage.locale, Locale::Zh);
    c.receive(err_reply(&req, CollaboratorError::Disconnected));
    assert_eq!(
        c.conversation().last().unwrap().text,
        messages::fallback(Locale::Zh, RequestKind::Chat, &CollaboratorError::Disconnected)
    );
}

#[test]
fn reflection_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&Reflection::ALittle).unwrap(), "\"a_little\"");
    assert_eq!(Reflection::Yes.label(Locale::Zh), "是的");
}
