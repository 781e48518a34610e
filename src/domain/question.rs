use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::names;

/// An option as submitted by an author. `correct` defaults to `false` when
/// the field is omitted from the request body.
#[derive(Clone, Debug, Deserialize)]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

/// A validated option. Identity is positional (1-based ordinal within the
/// question), so insertion order must be preserved all the way to scoring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    pub correct: bool,
}

/// A question that passed validation, ready to be persisted.
#[derive(Clone, Debug)]
pub struct ValidatedQuestion {
    pub title: String,
    pub options: Vec<QuestionOption>,
    pub has_multi_correct: bool,
}

/// Validate a question's title and options.
///
/// Rejects an empty title, any option with empty text, an option count
/// outside the configured bounds, and option sets without a correct answer.
/// `has_multi_correct` is recomputed here on every call, so the stored flag
/// can never go stale after an update.
///
/// Duplicate option texts are deliberately not rejected; that check lives
/// in the authoring form, not in the engine.
pub fn validate(title: &str, options: &[OptionInput]) -> Result<ValidatedQuestion, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation(
            "Question title is required.".to_owned(),
        ));
    }

    if options.len() < names::MIN_OPTIONS || options.len() > names::MAX_OPTIONS {
        return Err(DomainError::Validation(format!(
            "Options length should be between {}-{}.",
            names::MIN_OPTIONS,
            names::MAX_OPTIONS
        )));
    }

    if options.iter().any(|option| option.text.trim().is_empty()) {
        return Err(DomainError::Validation(
            "Every option needs a non-empty text.".to_owned(),
        ));
    }

    let correct_count = options.iter().filter(|option| option.correct).count();
    if correct_count < 1 {
        return Err(DomainError::Validation(
            "Options must have at least 1 correct option.".to_owned(),
        ));
    }

    let options = options
        .iter()
        .map(|option| QuestionOption {
            text: option.text.trim().to_owned(),
            correct: option.correct,
        })
        .collect();

    Ok(ValidatedQuestion {
        title: title.to_owned(),
        options,
        has_multi_correct: correct_count > 1,
    })
}
