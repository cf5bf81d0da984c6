pub mod journal_entry;
pub mod mood_entry;
pub mod prompt;
pub mod user_settings;
