// Database model structs
//
// The raw `*Row` structs mirror table columns (SQLite has no real booleans,
// so flags come back as integers); the `*Record` structs are what the rest
// of the crate works with.

use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;

use crate::domain::question::QuestionOption;
use crate::domain::quiz::{QuizState, QuizStatus};

#[derive(Clone, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

#[derive(Deserialize)]
pub(super) struct QuizRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub status: String,
    pub permalink: Option<String>,
    pub deleted: i64,
    pub author_id: i64,
    pub questions_count: i64,
}

#[derive(Deserialize)]
pub(super) struct QuestionRow {
    pub id: i64,
    pub quiz_id: i64,
    pub title: String,
    pub has_multi_correct: i64,
}

#[derive(Deserialize)]
pub(super) struct OptionRow {
    pub question_id: i64,
    pub text: String,
    pub correct: i64,
}

/// A stored quiz with its derived question count.
#[derive(Clone, Debug)]
pub struct QuizRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: QuizStatus,
    pub permalink: Option<String>,
    pub deleted: bool,
    pub author_id: i64,
    pub questions_count: i64,
}

impl QuizRecord {
    pub fn state(&self) -> QuizState {
        QuizState {
            status: self.status,
            deleted: self.deleted,
            questions_count: self.questions_count,
        }
    }
}

impl TryFrom<QuizRow> for QuizRecord {
    type Error = color_eyre::Report;

    fn try_from(row: QuizRow) -> Result<Self> {
        let status = QuizStatus::parse(&row.status)
            .ok_or_else(|| eyre!("quiz {} has unknown status {:?}", row.id, row.status))?;
        let tags = match row.tags {
            Some(tags) => Some(serde_json::from_str(&tags)?),
            None => None,
        };
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            tags,
            status,
            permalink: row.permalink,
            deleted: row.deleted != 0,
            author_id: row.author_id,
            questions_count: row.questions_count,
        })
    }
}

/// A stored question with its options in ordinal order.
#[derive(Clone, Debug)]
pub struct QuestionRecord {
    pub id: i64,
    pub quiz_id: i64,
    pub title: String,
    pub options: Vec<QuestionOption>,
    pub has_multi_correct: bool,
}
