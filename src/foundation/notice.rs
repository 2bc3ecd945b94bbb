use serde::Serialize;

use crate::foundation::core::Locale;

/// Category of a non-fatal condition reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A template asset could not be loaded; the stage renders without it.
    AssetUnavailable,
    /// A fill could not be applied; the part stays unfilled.
    FillFailed,
    /// The assistant could not be reached; a fallback message was shown.
    AssistantUnavailable,
}

/// Non-fatal, user-visible status message queued by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Category.
    pub kind: NoticeKind,
    /// Technical detail for logs; not localized.
    pub detail: String,
}

impl Notice {
    /// Build a notice.
    pub fn new(kind: NoticeKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Localized, user-facing text.
    pub fn message(&self, locale: Locale) -> &'static str {
        match (self.kind, locale) {
            (NoticeKind::AssetUnavailable, Locale::En) => {
                "Part of the picture could not be loaded. You can keep drawing."
            }
            (NoticeKind::AssetUnavailable, Locale::Zh) => "部分图片无法加载，你可以继续画画。",
            (NoticeKind::FillFailed, Locale::En) => "That area could not be colored this time.",
            (NoticeKind::FillFailed, Locale::Zh) => "这次没能为该区域上色。",
            (NoticeKind::AssistantUnavailable, Locale::En) => {
                "The guide is taking a break. Your drawing is safe."
            }
            (NoticeKind::AssistantUnavailable, Locale::Zh) => "助手暂时无法回应，你的画作已保存。",
        }
    }
}
