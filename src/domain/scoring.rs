use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::question::QuestionOption;
use super::quiz::{QuizState, QuizStatus};
use super::DomainError;

/// One submitted answer: the 1-based ordinals the player selected for the
/// question at the same position. Submissions are ephemeral; nothing here is
/// persisted.
#[derive(Clone, Debug, Deserialize)]
pub struct SubmittedAnswer {
    pub response: Vec<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub total: usize,
    pub correct: usize,
}

/// Grade a submission against the stored questions.
///
/// A question counts as correct iff the set of selected ordinals equals the
/// set of correct ordinals exactly. There is no partial credit: a player who
/// picks one of two correct options on a multi-correct question scores zero
/// for it. Both sides are compared as sets, so duplicates and ordering in
/// the submission are irrelevant.
///
/// Answers are aligned positionally with the questions as loaded; the
/// submission must carry exactly one entry per question. A short or long
/// answer list is an error rather than a zero score, so client bugs are not
/// silently masked.
pub fn score(
    state: QuizState,
    questions: &[&[QuestionOption]],
    answers: &[SubmittedAnswer],
) -> Result<ScoreResult, DomainError> {
    if state.status != QuizStatus::Active {
        return Err(DomainError::StateConflict("Quiz is not published"));
    }
    if state.deleted {
        return Err(DomainError::StateConflict("Quiz is inactivated"));
    }
    if answers.len() != questions.len() {
        return Err(DomainError::MalformedSubmission(format!(
            "expected {} answers, got {}",
            questions.len(),
            answers.len()
        )));
    }

    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(options, answer)| {
            let correct_set = correct_ordinals(options);
            let answer_set: BTreeSet<u32> = answer.response.iter().copied().collect();
            answer_set == correct_set
        })
        .count();

    Ok(ScoreResult {
        total: questions.len(),
        correct,
    })
}

/// The 1-based ordinals of every correct option, in ordinal order.
pub fn correct_ordinals(options: &[QuestionOption]) -> BTreeSet<u32> {
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| option.correct)
        .map(|(idx, _)| idx as u32 + 1)
        .collect()
}
