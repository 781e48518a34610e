use rand::Rng;
use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::names;

/// Lifecycle state of a quiz. The only forward transition is
/// `Draft -> Active` (publish); `Inactive` is reached through the soft-delete
/// flag rather than a transition of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Draft,
    Active,
    Inactive,
}

impl QuizStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// The transition table. Publishing is one-way; nothing else moves.
    pub fn can_transition(self, next: Self) -> bool {
        matches!((self, next), (Self::Draft, Self::Active))
    }
}

/// The lifecycle-relevant snapshot of a stored quiz.
#[derive(Clone, Copy, Debug)]
pub struct QuizState {
    pub status: QuizStatus,
    pub deleted: bool,
    pub questions_count: i64,
}

/// The author-editable fields of a quiz.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizFields {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A partial update: only provided fields are overwritten.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuizPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validate input for a brand-new quiz. New quizzes always start as a
/// non-deleted draft; status and the deleted flag are not caller-supplied.
pub fn new_quiz(
    title: &str,
    description: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<QuizFields, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation(
            "Please send a Quiz title.".to_owned(),
        ));
    }

    let tags = match tags {
        Some(tags) if tags.is_empty() => {
            return Err(DomainError::Validation(
                "Please send at least 1 tag in the array.".to_owned(),
            ));
        }
        Some(tags) => Some(validated_tags(tags)?),
        None => None,
    };

    Ok(QuizFields {
        title: title.to_owned(),
        description,
        tags,
    })
}

/// Apply a partial update to a draft quiz.
///
/// Fails once the quiz is published or soft-deleted. Absent fields keep
/// their current value; a provided-but-empty tag list clears the tags to
/// unset rather than storing an empty list.
pub fn apply_update(
    state: QuizState,
    current: QuizFields,
    patch: QuizPatch,
) -> Result<QuizFields, DomainError> {
    if state.status == QuizStatus::Active {
        return Err(DomainError::StateConflict("Can not edit a published Quiz"));
    }
    if state.deleted {
        return Err(DomainError::StateConflict("Quiz is inactivated"));
    }

    let title = match patch.title {
        Some(title) => {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(DomainError::Validation(
                    "Quiz title must not be empty.".to_owned(),
                ));
            }
            title
        }
        None => current.title,
    };

    let tags = match patch.tags {
        // An empty tag list clears the field entirely.
        Some(tags) if tags.is_empty() => None,
        Some(tags) => Some(validated_tags(tags)?),
        None => current.tags,
    };

    Ok(QuizFields {
        title,
        description: patch.description.or(current.description),
        tags,
    })
}

/// Check that a quiz may be published right now.
pub fn authorize_publish(state: QuizState) -> Result<(), DomainError> {
    if state.status == QuizStatus::Active {
        return Err(DomainError::StateConflict("Quiz is already published"));
    }
    if state.deleted {
        return Err(DomainError::StateConflict("Quiz is inactivated"));
    }
    if state.questions_count < 1 {
        return Err(DomainError::StateConflict(
            "Quiz does not have any questions associated",
        ));
    }
    debug_assert!(state.status.can_transition(QuizStatus::Active));
    Ok(())
}

/// Check that questions may be added to this quiz: the quiz must still be a
/// live draft and below the question cap.
pub fn authorize_question_create(state: QuizState) -> Result<(), DomainError> {
    authorize_question_mutation(state)?;
    if state.questions_count >= names::MAX_QUESTIONS_PER_QUIZ {
        return Err(DomainError::StateConflict(
            "A Quiz cannot have more than 10 questions",
        ));
    }
    Ok(())
}

/// Check that an existing question may be edited or removed. Publishing or
/// soft-deleting the parent quiz freezes its questions.
pub fn authorize_question_mutation(state: QuizState) -> Result<(), DomainError> {
    if state.status == QuizStatus::Active {
        return Err(DomainError::StateConflict(
            "Questions of a published Quiz can not be changed",
        ));
    }
    if state.deleted {
        return Err(DomainError::StateConflict("Quiz is inactivated"));
    }
    Ok(())
}

/// Draw a fresh permalink token. Uniqueness is enforced by the storage
/// layer; callers re-draw on collision.
pub fn new_permalink<R: Rng>(rng: &mut R) -> String {
    (0..names::PERMALINK_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..names::PERMALINK_ALPHABET.len());
            names::PERMALINK_ALPHABET[idx] as char
        })
        .collect()
}

fn validated_tags(tags: Vec<String>) -> Result<Vec<String>, DomainError> {
    tags.into_iter()
        .map(|tag| {
            let tag = tag.trim().to_owned();
            if tag.is_empty() {
                Err(DomainError::Validation(
                    "Tags must not contain empty strings.".to_owned(),
                ))
            } else {
                Ok(tag)
            }
        })
        .collect()
}
