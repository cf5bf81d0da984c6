use axum::{extract::Path, Json};

use crate::display::{MoodDisplay, MOOD_OPTIONS};
use crate::models::prompt::{prompt_by_code, random_prompt, Prompt};

pub async fn random_journal_prompt() -> Json<Prompt> {
    Json(Prompt::from(random_prompt()))
}

/// Unknown codes answer with the first prompt
pub async fn journal_prompt(Path(code): Path<String>) -> Json<Prompt> {
    Json(Prompt::from(prompt_by_code(&code)))
}

pub async fn list_moods() -> Json<[MoodDisplay; 5]> {
    Json(MOOD_OPTIONS)
}
