//! Stage catalog: the fixed, ordered sequence of guided drawing stages.
//!
//! Stage `0` is the introduction and the last stage is the summary. Every stage in between is
//! associated with exactly one template part and is gated by a submission.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Locale, LocalizedText};
use crate::foundation::error::{ArborError, ArborResult};

/// One fillable region of the template artwork.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePart {
    /// Stable part name (e.g. `roots`).
    pub name: String,
    /// File stem used by asset sources to locate the part's SVGs.
    pub asset: String,
}

/// Immutable descriptor for one stage of the guided sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Ordinal index within the catalog.
    pub index: usize,
    /// Display title.
    pub title: LocalizedText,
    /// Short instruction shown as the first assistant bubble.
    pub instruction: LocalizedText,
    /// Longer reflective prompt.
    #[serde(default)]
    pub description: LocalizedText,
    /// Name used when describing the stage to the assistant.
    #[serde(default)]
    pub topic: LocalizedText,
    /// Optional example image reference (opaque to the engine).
    #[serde(default)]
    pub example_image: Option<String>,
    /// Template part edited during this stage. `None` for introduction and summary.
    #[serde(default)]
    pub part: Option<usize>,
    /// Whether this is the closing summary stage.
    #[serde(default)]
    pub summary: bool,
}

/// Validated, ordered set of stages plus the template parts they reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCatalog {
    stages: Vec<Stage>,
    parts: Vec<TemplatePart>,
    /// Part always drawn on top of every other part.
    #[serde(default)]
    overlay_part: Option<usize>,
    /// Asset stem of the optional decorative frame drawn under every part.
    #[serde(default)]
    frame: Option<String>,
}

impl StageCatalog {
    /// Build and validate a catalog.
    pub fn new(
        stages: Vec<Stage>,
        parts: Vec<TemplatePart>,
        overlay_part: Option<usize>,
        frame: Option<String>,
    ) -> ArborResult<Self> {
        let catalog = Self {
            stages,
            parts,
            overlay_part,
            frame,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: &Path) -> ArborResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read stage catalog '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Parse a catalog from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> ArborResult<Self> {
        let catalog: Self = serde_json::from_slice(bytes)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the structural rules every catalog must satisfy.
    pub fn validate(&self) -> ArborResult<()> {
        let n = self.stages.len();
        if n < 2 {
            return Err(ArborError::validation(
                "catalog needs at least an introduction and a summary stage",
            ));
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if stage.index != i {
                return Err(ArborError::validation(format!(
                    "stage at position {i} has index {}",
                    stage.index
                )));
            }
            let is_last = i + 1 == n;
            if stage.summary != is_last {
                return Err(ArborError::validation(
                    "exactly the last stage must be the summary",
                ));
            }
            match (i == 0 || is_last, stage.part) {
                (true, Some(_)) => {
                    return Err(ArborError::validation(
                        "introduction and summary stages cannot own a part",
                    ));
                }
                (false, None) => {
                    return Err(ArborError::validation(format!(
                        "gated stage {i} must reference a template part"
                    )));
                }
                (false, Some(p)) if p >= self.parts.len() => {
                    return Err(ArborError::validation(format!(
                        "stage {i} references unknown part {p}"
                    )));
                }
                _ => {}
            }
        }
        if let Some(p) = self.overlay_part
            && p >= self.parts.len()
        {
            return Err(ArborError::validation(format!(
                "overlay part {p} is out of range"
            )));
        }
        Ok(())
    }

    /// All stages in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage at `index`.
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false` for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Index of the summary stage.
    pub fn summary_index(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// Whether advancing from `index` requires a submission.
    pub fn is_gated(&self, index: usize) -> bool {
        index > 0 && index < self.summary_index()
    }

    /// Template part owned by stage `index`.
    pub fn part_of(&self, index: usize) -> Option<usize> {
        self.stages.get(index).and_then(|s| s.part)
    }

    /// All template parts.
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// The part drawn above every other part, if any.
    pub fn overlay_part(&self) -> Option<usize> {
        self.overlay_part
    }

    /// Asset stem of the decorative frame, if any.
    pub fn frame(&self) -> Option<&str> {
        self.frame.as_deref()
    }

    /// Topic string describing stage `index` to the assistant.
    pub fn topic(&self, index: usize, locale: Locale) -> String {
        self.stages
            .get(index)
            .map(|s| {
                let t = s.topic.get(locale);
                if t.is_empty() {
                    s.title.get(locale).to_string()
                } else {
                    t.to_string()
                }
            })
            .unwrap_or_default()
    }

    /// The built-in "tree of life" sequence: introduction, seven tree parts, summary.
    ///
    /// The `bugs` part is the overlay part.
    pub fn tree_of_life() -> Self {
        let names = ["roots", "trunk", "branches", "leaves", "fruits", "bugs", "storms"];
        let parts: Vec<TemplatePart> = names
            .iter()
            .map(|name| TemplatePart {
                name: (*name).to_string(),
                asset: (*name).to_string(),
            })
            .collect();

        let title = LocalizedText::new("Tree of Life", "生命之树");
        let mut stages = vec![Stage {
            index: 0,
            title: title.clone(),
            instruction: LocalizedText::new(
                "Welcome. We will grow your tree of life one part at a time.",
                "欢迎。我们将一步一步画出你的生命之树。",
            ),
            description: LocalizedText::new(
                "Each step invites you to draw, color or write about one part of your life.",
                "每一步都会邀请你画画、上色或写下生命中的一部分。",
            ),
            topic: LocalizedText::new("introduction", "介绍"),
            example_image: None,
            part: None,
            summary: false,
        }];

        let gated: [(&str, &str, &str, &str, &str, &str); 7] = [
            (
                "Let's start by drawing the roots of your tree.",
                "我们先从画出你生命之树的根开始吧。",
                "Think about your origins and foundations.\nDraw or write what has shaped you - family, culture, values, important places.",
                "回想你人生的起点与支撑力量。\n可以画下或写下那些塑造你的元素——例如家庭、文化、价值观、重要的地方……",
                "roots (origins and foundations)",
                "根（起源与基础）",
            ),
            (
                "Now draw the trunk of your tree.",
                "现在画出你的树干。",
                "Think about your strengths and skills.\nWhat keeps you standing strong?",
                "想想你的优势和技能。\n是什么让你坚强地站立？",
                "trunk (strengths and skills)",
                "树干（优势与技能）",
            ),
            (
                "Add branches to your tree.",
                "为你的树添加枝条。",
                "Think about your hopes and dreams.\nWhere do you want to grow?",
                "想想你的希望和梦想。\n你想在哪里成长？",
                "branches (hopes and dreams)",
                "枝条（希望与梦想）",
            ),
            (
                "Give your tree its leaves.",
                "为你的树画上树叶。",
                "Think about the important people in your life.",
                "想想你生命中重要的人。",
                "leaves (relationships and connections)",
                "树叶（关系与联系）",
            ),
            (
                "Let your tree bear fruits and flowers.",
                "让你的树开花结果。",
                "Think about what you have achieved and are proud of.",
                "想想你取得的成就和让你自豪的事情。",
                "fruits/flowers (achievements)",
                "果实/花朵（成就）",
            ),
            (
                "Every tree has a few bugs.",
                "每棵树都会有一些小虫子。",
                "Think about your worries and imperfections.",
                "想想你的担忧和不完美之处。",
                "bugs (worries and imperfections)",
                "虫子（担忧与不完美）",
            ),
            (
                "Draw the storms your tree has weathered.",
                "画出你的树经历过的风暴。",
                "Think about the challenges and big changes in your life.",
                "想想你生命中的挑战和重大变化。",
                "storms (challenges and changes)",
                "风暴（挑战与变化）",
            ),
        ];

        for (i, (ins_en, ins_zh, desc_en, desc_zh, topic_en, topic_zh)) in
            gated.into_iter().enumerate()
        {
            stages.push(Stage {
                index: i + 1,
                title: title.clone(),
                instruction: LocalizedText::new(ins_en, ins_zh),
                description: LocalizedText::new(desc_en, desc_zh),
                topic: LocalizedText::new(topic_en, topic_zh),
                example_image: Some(format!("examples/{}.png", parts[i].name)),
                part: Some(i),
                summary: false,
            });
        }

        stages.push(Stage {
            index: stages.len(),
            title,
            instruction: LocalizedText::new("You completed your tree of life!", "你完成啦！"),
            description: LocalizedText::new(
                "Say aloud: \"I just worked on my mental health. I'm proud of myself.\"",
                "请你大声说：\"我刚刚为自己的心理健康做了一件事，我为自己感到骄傲。\"",
            ),
            topic: LocalizedText::new("summary", "总结"),
            example_image: None,
            part: None,
            summary: true,
        });

        Self {
            stages,
            parts,
            overlay_part: Some(5),
            frame: None,
        }
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::tree_of_life()
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
