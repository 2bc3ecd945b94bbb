use super::*;
use crate::session::assistant::{SnapshotImage, StageContext};

fn request(locale: Locale, kind: RequestKind) -> AssistantRequest {
    AssistantRequest {
        id: 1,
        kind,
        stage: StageContext {
            index: 2,
            topic: "trunk".to_string(),
            locale,
            summary: false,
        },
        conversation: Vec::new(),
        image: Some(SnapshotImage::from_png(Vec::new())),
    }
}

#[test]
fn prompts_are_localized() {
    let en = system_prompt(Locale::En, "trunk");
    let zh = system_prompt(Locale::Zh, "树干");
    assert!(en.contains("Tree of Life") && en.ends_with("trunk"));
    assert!(zh.contains("生命之树") && zh.ends_with("树干"));
    assert_ne!(closing_text(Locale::En), closing_text(Locale::Zh));
    assert!(submission_text(Locale::En, "roots").contains("roots"));
}

#[test]
fn rate_limit_fallback_differs_from_network_fallback() {
    let limited = fallback(
        Locale::En,
        RequestKind::Submission,
        &CollaboratorError::RateLimited {
            retry_after_secs: Some(3),
        },
    );
    let network = fallback(
        Locale::En,
        RequestKind::Submission,
        &CollaboratorError::Network("reset".into()),
    );
    assert_ne!(limited, network);
}

#[test]
fn every_fallback_is_non_empty() {
    let errors = [
        CollaboratorError::Network("x".into()),
        CollaboratorError::Auth("x".into()),
        CollaboratorError::RateLimited {
            retry_after_secs: None,
        },
        CollaboratorError::Malformed("x".into()),
        CollaboratorError::Disconnected,
    ];
    for locale in [Locale::En, Locale::Zh] {
        for kind in [RequestKind::Submission, RequestKind::Closing, RequestKind::Chat] {
            for e in &errors {
                assert!(!fallback(locale, kind, e).is_empty());
            }
        }
        assert!(!reflection_ack(locale).is_empty());
    }
}

#[test]
fn offline_reply_mentions_the_submitted_topic() {
    assert!(offline_reply(&request(Locale::En, RequestKind::Submission)).contains("trunk"));
    assert!(offline_reply(&request(Locale::Zh, RequestKind::Submission)).contains("trunk"));
}
