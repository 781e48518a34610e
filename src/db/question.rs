use std::collections::HashMap;

use color_eyre::{eyre::eyre, Result};
use libsql::params;

use super::helpers::{query_all, query_optional};
use super::models::{OptionRow, QuestionRecord, QuestionRow};
use super::Db;
use crate::domain::question::{QuestionOption, ValidatedQuestion};

impl Db {
    /// Insert a question with its options atomically in a transaction.
    pub async fn create_question(
        &self,
        quiz_id: i64,
        question: &ValidatedQuestion,
    ) -> Result<QuestionRecord> {
        let conn = self.db.connect()?;
        let tx = conn.transaction().await?;

        let question_id = tx
            .query(
                "INSERT INTO questions (title, has_multi_correct, quiz_id) VALUES (?, ?, ?) RETURNING id",
                params![
                    question.title.as_str(),
                    i64::from(question.has_multi_correct),
                    quiz_id
                ],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| eyre!("could not get question id"))?
            .get::<i64>(0)?;

        insert_options(&tx, question_id, &question.options).await?;
        tx.commit().await?;

        tracing::info!("new question created with id: {question_id} for quiz_id: {quiz_id}");
        self.load_question(quiz_id, question_id)
            .await?
            .ok_or_else(|| eyre!("question {question_id} vanished right after insert"))
    }

    /// All questions of a quiz in insertion order, options in ordinal order.
    /// Scoring depends on both orderings.
    pub async fn load_questions(&self, quiz_id: i64) -> Result<Vec<QuestionRecord>> {
        let conn = self.db.connect()?;
        let questions: Vec<QuestionRow> = query_all(
            &conn,
            "SELECT id, quiz_id, title, has_multi_correct FROM questions WHERE quiz_id = ? ORDER BY id",
            params![quiz_id],
        )
        .await?;

        let options: Vec<OptionRow> = query_all(
            &conn,
            r#"
            SELECT o.question_id AS question_id, o.text AS text, o.correct AS correct
            FROM options o
            JOIN questions q ON q.id = o.question_id
            WHERE q.quiz_id = ?
            ORDER BY o.question_id, o.position
            "#,
            params![quiz_id],
        )
        .await?;

        let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
        for row in options {
            by_question
                .entry(row.question_id)
                .or_default()
                .push(QuestionOption {
                    text: row.text,
                    correct: row.correct != 0,
                });
        }

        Ok(questions
            .into_iter()
            .map(|row| QuestionRecord {
                options: by_question.remove(&row.id).unwrap_or_default(),
                id: row.id,
                quiz_id: row.quiz_id,
                title: row.title,
                has_multi_correct: row.has_multi_correct != 0,
            })
            .collect())
    }

    pub async fn load_question(
        &self,
        quiz_id: i64,
        question_id: i64,
    ) -> Result<Option<QuestionRecord>> {
        let conn = self.db.connect()?;
        let row: Option<QuestionRow> = query_optional(
            &conn,
            "SELECT id, quiz_id, title, has_multi_correct FROM questions WHERE id = ? AND quiz_id = ?",
            params![question_id, quiz_id],
        )
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let options: Vec<OptionRow> = query_all(
            &conn,
            "SELECT question_id, text, correct FROM options WHERE question_id = ? ORDER BY position",
            params![question_id],
        )
        .await?;

        Ok(Some(QuestionRecord {
            id: row.id,
            quiz_id: row.quiz_id,
            title: row.title,
            options: options
                .into_iter()
                .map(|o| QuestionOption {
                    text: o.text,
                    correct: o.correct != 0,
                })
                .collect(),
            has_multi_correct: row.has_multi_correct != 0,
        }))
    }

    /// Replace a question's title and options. Returns `false` when the
    /// question does not belong to the quiz.
    pub async fn update_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        question: &ValidatedQuestion,
    ) -> Result<bool> {
        let conn = self.db.connect()?;
        let tx = conn.transaction().await?;

        let affected = tx
            .execute(
                "UPDATE questions SET title = ?, has_multi_correct = ? WHERE id = ? AND quiz_id = ?",
                params![
                    question.title.as_str(),
                    i64::from(question.has_multi_correct),
                    question_id,
                    quiz_id
                ],
            )
            .await?;
        if affected != 1 {
            return Ok(false);
        }

        // Options are replaced wholesale so ordinals stay dense.
        tx.execute(
            "DELETE FROM options WHERE question_id = ?",
            params![question_id],
        )
        .await?;
        insert_options(&tx, question_id, &question.options).await?;
        tx.commit().await?;

        tracing::info!("question updated with id: {question_id} for quiz_id: {quiz_id}");
        Ok(true)
    }

    pub async fn delete_question(&self, quiz_id: i64, question_id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        let affected = conn
            .execute(
                "DELETE FROM questions WHERE id = ? AND quiz_id = ?",
                params![question_id, quiz_id],
            )
            .await?;

        tracing::info!("question deleted with id: {question_id} from quiz_id: {quiz_id}");
        Ok(affected == 1)
    }

    pub async fn count_questions(&self, quiz_id: i64) -> Result<i64> {
        let conn = self.db.connect()?;
        let count = conn
            .query(
                "SELECT COUNT(*) FROM questions WHERE quiz_id = ?",
                params![quiz_id],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| eyre!("could not count questions"))?
            .get::<i64>(0)?;

        Ok(count)
    }
}

async fn insert_options(
    tx: &libsql::Transaction,
    question_id: i64,
    options: &[QuestionOption],
) -> Result<()> {
    for (idx, option) in options.iter().enumerate() {
        tx.execute(
            "INSERT INTO options (position, text, correct, question_id) VALUES (?, ?, ?, ?)",
            params![
                idx as i64 + 1,
                option.text.as_str(),
                i64::from(option.correct),
                question_id
            ],
        )
        .await?;
    }
    Ok(())
}
