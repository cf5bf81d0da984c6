use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `prompts` reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Prompt {
    pub code: String,
    pub prompt: String,
}

pub struct PromptSeed {
    pub code: &'static str,
    pub prompt: &'static str,
}

impl From<&PromptSeed> for Prompt {
    fn from(seed: &PromptSeed) -> Self {
        Self {
            code: seed.code.to_string(),
            prompt: seed.prompt.to_string(),
        }
    }
}

/// Fixed set of guided journaling questions. Mirrors the rows seeded by the
/// initial migration.
pub static JOURNAL_PROMPTS: [PromptSeed; 8] = [
    PromptSeed { code: "gratitude", prompt: "今日感謝したいことは何ですか？" },
    PromptSeed { code: "success", prompt: "今日うまくいったことを教えてください" },
    PromptSeed { code: "support", prompt: "あなたを支えてくれる人について書いてください" },
    PromptSeed { code: "learning", prompt: "今日学んだことは何ですか？" },
    PromptSeed { code: "tomorrow", prompt: "明日楽しみにしていることは何ですか？" },
    PromptSeed { code: "strength", prompt: "あなたの強みを一つ教えてください" },
    PromptSeed { code: "smile", prompt: "今日笑顔になった瞬間はありましたか？" },
    PromptSeed { code: "goal", prompt: "今週達成したい小さな目標は何ですか？" },
];

/// Uniform pick from the static list. Not seeded.
pub fn random_prompt() -> &'static PromptSeed {
    JOURNAL_PROMPTS
        .choose(&mut rand::thread_rng())
        .unwrap_or(&JOURNAL_PROMPTS[0])
}

/// Display lookup: unknown codes fall back to the first prompt.
///
/// Server writes resolve prompts through the gateway instead and reject
/// unknown codes.
pub fn prompt_by_code(code: &str) -> &'static PromptSeed {
    JOURNAL_PROMPTS
        .iter()
        .find(|p| p.code == code)
        .unwrap_or(&JOURNAL_PROMPTS[0])
}
