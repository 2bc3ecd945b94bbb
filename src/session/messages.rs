//! Locally authored, localized chat text.

use crate::foundation::core::Locale;
use crate::foundation::error::CollaboratorError;
use crate::session::assistant::{AssistantRequest, RequestKind};

/// Framing for every assistant conversation, with the stage topic filled in.
pub fn system_prompt(locale: Locale, topic: &str) -> String {
    match locale {
        Locale::En => format!(
            "You are a warm, supportive guide for the \"Tree of Life\" drawing reflection. \
             The person draws a tree whose roots, trunk, branches, leaves, fruits, bugs and \
             storms stand for parts of their life story. When you receive a drawing, describe \
             what you notice (colors, symbols, words, overall feeling), ask one gentle \
             open-ended question, and acknowledge their effort. Never judge and never give \
             medical advice. Answer in two to four sentences.\n\nCurrent stage: {topic}"
        ),
        Locale::Zh => format!(
            "你是一位温暖、支持性的\"生命之树\"绘画反思引导者。来访者通过画一棵树来讲述生命故事：\
             根、树干、枝条、树叶、果实、虫子和风暴分别代表生命的不同部分。收到绘画时，描述你\
             注意到的内容（颜色、符号、文字、整体感受），提出一个温和的开放式问题，并肯定他们的\
             努力。绝不评判，也不提供医疗建议。用两到四句话回答。\n\n当前阶段：{topic}"
        ),
    }
}

/// User message sent alongside a stage submission.
pub fn submission_text(locale: Locale, topic: &str) -> String {
    match locale {
        Locale::En => format!("Here is my drawing for the {topic}."),
        Locale::Zh => format!("这是我画的{topic}。"),
    }
}

/// User message sent alongside the closing request.
pub fn closing_text(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "I finished my tree of life. Here is the whole picture.",
        Locale::Zh => "我完成了我的生命之树，这是完整的画。",
    }
}

/// Fallback shown in place of an assistant reply that failed.
pub fn fallback(locale: Locale, kind: RequestKind, error: &CollaboratorError) -> &'static str {
    match (locale, kind, error) {
        (Locale::En, _, CollaboratorError::RateLimited { .. }) => {
            "Lots of people are talking with me right now. Your drawing is saved, and you can \
             keep going whenever you are ready."
        }
        (Locale::Zh, _, CollaboratorError::RateLimited { .. }) => {
            "现在有很多人在和我交谈。你的画已经保存，准备好后可以继续。"
        }
        (Locale::En, RequestKind::Submission, _) => {
            "I could not look at your drawing just now, but thank you for sharing it. Take a \
             moment to notice how it feels, then continue to the next step when you are ready."
        }
        (Locale::Zh, RequestKind::Submission, _) => {
            "我暂时无法查看你的画，但谢谢你的分享。花一点时间感受一下，准备好后就可以进入下一步。"
        }
        (Locale::En, RequestKind::Closing, _) => {
            "You have completed your whole tree. Well done for taking this time for yourself."
        }
        (Locale::Zh, RequestKind::Closing, _) => "你完成了整棵树。为自己花时间做这件事，做得很好。",
        (Locale::En, RequestKind::Chat, _) => {
            "I am having trouble answering right now. You can keep drawing while I reconnect."
        }
        (Locale::Zh, RequestKind::Chat, _) => "我现在暂时无法回答，你可以继续画画。",
    }
}

/// Acknowledgement of the completion reflection.
pub fn reflection_ack(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Thank you for telling me. Take care of yourself.",
        Locale::Zh => "谢谢你的反馈，照顾好自己。",
    }
}

/// Short canned reply used by the offline assistant.
pub fn offline_reply(request: &AssistantRequest) -> String {
    let topic = &request.stage.topic;
    match (request.stage.locale, request.kind) {
        (Locale::En, RequestKind::Submission) => {
            format!("Thank you for sharing your {topic}. What part of it feels most important to you?")
        }
        (Locale::Zh, RequestKind::Submission) => {
            format!("谢谢你分享你的{topic}。其中哪一部分对你来说最重要？")
        }
        (Locale::En, RequestKind::Closing) => {
            "Your tree is complete. Looking at it as a whole, what stands out to you?".to_string()
        }
        (Locale::Zh, RequestKind::Closing) => "你的树完成了。整体看一看，什么最让你印象深刻？".to_string(),
        (Locale::En, RequestKind::Chat) => "I hear you. Tell me more whenever you like.".to_string(),
        (Locale::Zh, RequestKind::Chat) => "我在听，想说更多随时告诉我。".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/messages.rs"]
mod tests;
