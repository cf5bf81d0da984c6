//! Field checks run on every submission before any store or relay call.

use crate::models::journal_entry::{JournalSubmission, NewJournalEntry};
use crate::models::mood_entry::{LevelInput, MoodSubmission, NewMoodEntry};

pub const MOOD_LEVELS: std::ops::RangeInclusive<i64> = 1..=5;
pub const STRESS_LEVELS: std::ops::RangeInclusive<i64> = 1..=10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required fields that were absent or blank, in declaration order
    #[error("Missing required fields: {}", field_list(.0))]
    Missing(Vec<&'static str>),

    #[error("{0}")]
    Invalid(String),
}

fn field_list(fields: &[&'static str]) -> String {
    fields.join(", ")
}

/// Validated mood submission, still carrying the caller-supplied user id
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMoodSubmission {
    pub user_id: String,
    pub entry: NewMoodEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidJournalSubmission {
    pub user_id: String,
    pub entry: NewJournalEntry,
}

impl NewMoodEntry {
    pub fn new(
        mood_level: i64,
        stress_level: i64,
        memo: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !MOOD_LEVELS.contains(&mood_level) {
            return Err(ValidationError::Invalid(
                "moodId must be between 1 and 5".into(),
            ));
        }
        if !STRESS_LEVELS.contains(&stress_level) {
            return Err(ValidationError::Invalid(
                "stressLevel must be between 1 and 10".into(),
            ));
        }

        Ok(Self {
            mood_level: mood_level as i32,
            stress_level: stress_level as i32,
            memo: memo.filter(|m| !m.is_empty()),
        })
    }
}

impl NewJournalEntry {
    pub fn new(prompt_code: &str, content: &str) -> Result<Self, ValidationError> {
        let mut missing = Vec::new();
        if prompt_code.is_empty() {
            missing.push("promptId");
        }
        if content.is_empty() {
            missing.push("answer");
        }
        if !missing.is_empty() {
            return Err(ValidationError::Missing(missing));
        }

        Ok(Self {
            prompt_code: prompt_code.to_string(),
            content: content.to_string(),
        })
    }
}

impl LevelInput {
    /// Zero, an empty string and whitespace count as "not supplied"
    fn is_blank(&self) -> bool {
        match self {
            LevelInput::Integer(n) => *n == 0,
            LevelInput::Decimal(n) => *n == 0.0,
            LevelInput::Text(s) => s.trim().is_empty(),
        }
    }

    /// Whole-number value; fractional or non-numeric input has none
    fn whole_number(&self) -> Option<i64> {
        match self {
            LevelInput::Integer(n) => Some(*n),
            LevelInput::Decimal(n) if n.fract() == 0.0 && n.is_finite() => Some(*n as i64),
            LevelInput::Decimal(_) => None,
            LevelInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn level(field: &'static str, input: &LevelInput) -> Result<i64, ValidationError> {
    input
        .whole_number()
        .ok_or_else(|| ValidationError::Invalid(format!("{field} must be a whole number")))
}

/// Presence first (`userId`, `moodId`, `stressLevel`), then ranges.
///
/// `moodId` follows truthiness: `0` or `""` is missing. `stressLevel` only
/// needs to be present, its range is checked afterwards.
pub fn validate_mood_submission(
    body: &MoodSubmission,
) -> Result<ValidMoodSubmission, ValidationError> {
    let mut missing = Vec::new();
    if !non_empty(&body.user_id) {
        missing.push("userId");
    }
    if body.mood_id.as_ref().map_or(true, LevelInput::is_blank) {
        missing.push("moodId");
    }
    if body.stress_level.is_none() {
        missing.push("stressLevel");
    }

    let (Some(user_id), Some(mood_id), Some(stress_level), true) = (
        body.user_id.as_ref(),
        body.mood_id.as_ref(),
        body.stress_level.as_ref(),
        missing.is_empty(),
    ) else {
        return Err(ValidationError::Missing(missing));
    };

    let entry = NewMoodEntry::new(
        level("moodId", mood_id)?,
        level("stressLevel", stress_level)?,
        body.memo.clone(),
    )?;

    Ok(ValidMoodSubmission {
        user_id: user_id.clone(),
        entry,
    })
}

pub fn validate_journal_submission(
    body: &JournalSubmission,
) -> Result<ValidJournalSubmission, ValidationError> {
    let mut missing = Vec::new();
    if !non_empty(&body.user_id) {
        missing.push("userId");
    }
    if !non_empty(&body.prompt_id) {
        missing.push("promptId");
    }
    if !non_empty(&body.answer) {
        missing.push("answer");
    }

    match (&body.user_id, &body.prompt_id, &body.answer) {
        (Some(user_id), Some(prompt_id), Some(answer)) if missing.is_empty() => {
            Ok(ValidJournalSubmission {
                user_id: user_id.clone(),
                entry: NewJournalEntry::new(prompt_id, answer)?,
            })
        }
        _ => Err(ValidationError::Missing(missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mood(user: Option<&str>, mood: Option<LevelInput>, stress: Option<LevelInput>) -> MoodSubmission {
        MoodSubmission {
            user_id: user.map(String::from),
            mood_id: mood,
            stress_level: stress,
            memo: None,
        }
    }

    #[test]
    fn test_valid_mood_submission_keeps_levels() {
        let body = mood(
            Some("u-1"),
            Some(LevelInput::Integer(4)),
            Some(LevelInput::Integer(7)),
        );
        let valid = validate_mood_submission(&body).unwrap();
        assert_eq!(valid.user_id, "u-1");
        assert_eq!(valid.entry.mood_level(), 4);
        assert_eq!(valid.entry.stress_level(), 7);
    }

    #[test]
    fn test_missing_fields_are_all_named() {
        let err = validate_mood_submission(&MoodSubmission::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Missing(vec!["userId", "moodId", "stressLevel"])
        );
        assert_eq!(
            err.to_string(),
            "Missing required fields: userId, moodId, stressLevel"
        );
    }

    #[test]
    fn test_validation_error_is_std_error() {
        let err: Box<dyn std::error::Error + Send + Sync> =
            Box::new(ValidationError::Missing(vec!["answer"]));
        assert_eq!(err.to_string(), "Missing required fields: answer");

        let err = anyhow::Error::from(ValidationError::Invalid("moodId must be between 1 and 5".into()));
        assert_eq!(err.to_string(), "moodId must be between 1 and 5");
    }

    #[test]
    fn test_zero_mood_is_missing_but_zero_stress_is_out_of_range() {
        let err = validate_mood_submission(&mood(
            Some("u"),
            Some(LevelInput::Integer(0)),
            Some(LevelInput::Integer(3)),
        ))
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing(vec!["moodId"]));

        let err = validate_mood_submission(&mood(
            Some("u"),
            Some(LevelInput::Integer(3)),
            Some(LevelInput::Integer(0)),
        ))
        .unwrap_err();
        assert!(matches!(err, ValidationError::Invalid(_)));
    }

    #[test]
    fn test_level_bounds() {
        assert!(NewMoodEntry::new(1, 1, None).is_ok());
        assert!(NewMoodEntry::new(5, 10, None).is_ok());
        assert!(NewMoodEntry::new(6, 5, None).is_err());
        assert!(NewMoodEntry::new(3, 11, None).is_err());
        assert!(NewMoodEntry::new(-1, 5, None).is_err());
    }

    #[test]
    fn test_numeric_strings_and_whole_decimals_accepted() {
        let body = mood(
            Some("u"),
            Some(LevelInput::Text("2".into())),
            Some(LevelInput::Decimal(9.0)),
        );
        let valid = validate_mood_submission(&body).unwrap();
        assert_eq!(valid.entry.mood_level(), 2);
        assert_eq!(valid.entry.stress_level(), 9);
    }

    #[test]
    fn test_fractional_level_rejected() {
        let body = mood(
            Some("u"),
            Some(LevelInput::Integer(2)),
            Some(LevelInput::Decimal(4.5)),
        );
        assert_eq!(
            validate_mood_submission(&body).unwrap_err(),
            ValidationError::Invalid("stressLevel must be a whole number".into())
        );
    }

    #[test]
    fn test_empty_memo_is_dropped() {
        let entry = NewMoodEntry::new(3, 3, Some(String::new())).unwrap();
        assert_eq!(entry.memo(), None);
    }

    #[test]
    fn test_journal_submission() {
        let body = JournalSubmission {
            user_id: Some("u".into()),
            prompt_id: Some("smile".into()),
            answer: Some("good day".into()),
        };
        let valid = validate_journal_submission(&body).unwrap();
        assert_eq!(valid.entry.prompt_code(), "smile");
        assert_eq!(valid.entry.content(), "good day");

        let body = JournalSubmission {
            user_id: Some("u".into()),
            prompt_id: Some(String::new()),
            answer: None,
        };
        assert_eq!(
            validate_journal_submission(&body).unwrap_err(),
            ValidationError::Missing(vec!["promptId", "answer"])
        );
    }
}
