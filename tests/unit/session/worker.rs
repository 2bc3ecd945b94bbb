use super::*;
use crate::foundation::core::Locale;
use crate::session::assistant::{RequestKind, ScriptedAssistant, StageContext};

fn request(id: u64) -> AssistantRequest {
    AssistantRequest {
        id,
        kind: RequestKind::Chat,
        stage: StageContext {
            index: 0,
            topic: String::new(),
            locale: Locale::En,
            summary: false,
        },
        conversation: Vec::new(),
        image: None,
    }
}

#[test]
fn inline_answers_on_dispatch() {
    let a = Arc::new(ScriptedAssistant::new([Ok("a".to_string())]));
    let mut w = AssistantWorker::inline(a.clone());
    assert!(!w.is_threaded());
    w.dispatch(request(1));
    assert_eq!(w.in_flight(), 1);
    let replies = w.poll();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].request_id, 1);
    assert_eq!(replies[0].result, Ok("a".to_string()));
    assert_eq!(w.in_flight(), 0);
    assert!(w.poll().is_empty());
}

#[test]
fn threaded_replies_arrive_in_order() {
    let a = Arc::new(ScriptedAssistant::new([
        Ok("one".to_string()),
        Err(CollaboratorError::RateLimited {
            retry_after_secs: None,
        }),
    ]));
    let mut w = AssistantWorker::threaded(a.clone());
    w.dispatch(request(1));
    w.dispatch(request(2));
    let first = w.recv_timeout(Duration::from_secs(10)).unwrap();
    let second = w.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(first.request_id, 1);
    assert_eq!(first.result, Ok("one".to_string()));
    assert_eq!(second.request_id, 2);
    assert!(second.result.is_err());
    assert_eq!(w.in_flight(), 0);
    assert_eq!(a.requests().len(), 2);
}

#[test]
fn recv_timeout_without_requests_returns_none() {
    let mut w = AssistantWorker::threaded(Arc::new(ScriptedAssistant::default()));
    assert!(w.recv_timeout(Duration::from_millis(10)).is_none());
    let mut inline = AssistantWorker::inline(Arc::new(ScriptedAssistant::default()));
    assert!(inline.recv_timeout(Duration::from_millis(10)).is_none());
}

struct Panicking;

impl Assistant for Panicking {
    fn send(&self, _request: &AssistantRequest) -> Result<String, CollaboratorError> {
        panic!("assistant crashed");
    }
}

#[test]
fn panicking_assistant_still_resolves_each_request() {
    let mut w = AssistantWorker::threaded(Arc::new(Panicking));
    w.dispatch(request(1));
    let first = w.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(first.request_id, 1);
    assert_eq!(first.result, Err(CollaboratorError::Disconnected));

    // The worker thread survives and keeps answering.
    w.dispatch(request(2));
    let second = w.recv_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(second.request_id, 2);
    assert_eq!(second.result, Err(CollaboratorError::Disconnected));
    assert_eq!(w.in_flight(), 0);
}

#[test]
fn panicking_assistant_inline_resolves_on_dispatch() {
    let mut w = AssistantWorker::inline(Arc::new(Panicking));
    w.dispatch(request(7));
    let replies = w.poll();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].request_id, 7);
    assert!(replies[0].result.is_err());
}
