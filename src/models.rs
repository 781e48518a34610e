// Request bodies and response views for the JSON API.
//
// Authors see full questions; everyone else gets the public view, which has
// no `correct` field at all. The split is done with separate types so a
// serializer can never leak a correctness flag by accident.

use serde::{Deserialize, Serialize};

use crate::db::models::{QuestionRecord, QuizRecord};
use crate::domain::question::OptionInput;
use crate::domain::quiz::QuizStatus;
use crate::domain::scoring::SubmittedAnswer;

#[derive(Deserialize)]
pub struct CreateQuizBody {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct QuestionBody {
    pub title: String,
    pub options: Vec<OptionInput>,
}

#[derive(Deserialize)]
pub struct SubmissionBody {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: QuizStatus,
    pub permalink: Option<String>,
    pub author: i64,
    pub questions_count: i64,
}

impl From<QuizRecord> for QuizView {
    fn from(quiz: QuizRecord) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            tags: quiz.tags,
            status: quiz.status,
            permalink: quiz.permalink,
            author: quiz.author_id,
            questions_count: quiz.questions_count,
        }
    }
}

/// Full question view: only ever serialized for the quiz's author.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: i64,
    pub quiz_id: i64,
    pub title: String,
    pub options: Vec<OptionView>,
    pub has_multi_correct: bool,
}

#[derive(Serialize)]
pub struct OptionView {
    pub text: String,
    pub correct: bool,
}

impl From<QuestionRecord> for QuestionView {
    fn from(question: QuestionRecord) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            title: question.title,
            options: question
                .options
                .into_iter()
                .map(|o| OptionView {
                    text: o.text,
                    correct: o.correct,
                })
                .collect(),
            has_multi_correct: question.has_multi_correct,
        }
    }
}

/// Player-facing question view: note there is no correctness flag anywhere
/// in this shape. `has_multi_correct` stays, the player UI needs it to pick
/// checkboxes over radio buttons.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestionView {
    pub id: i64,
    pub quiz_id: i64,
    pub title: String,
    pub options: Vec<PublicOptionView>,
    pub has_multi_correct: bool,
}

#[derive(Serialize)]
pub struct PublicOptionView {
    pub text: String,
}

impl From<QuestionRecord> for PublicQuestionView {
    fn from(question: QuestionRecord) -> Self {
        Self {
            id: question.id,
            quiz_id: question.quiz_id,
            title: question.title,
            options: question
                .options
                .into_iter()
                .map(|o| PublicOptionView { text: o.text })
                .collect(),
            has_multi_correct: question.has_multi_correct,
        }
    }
}
