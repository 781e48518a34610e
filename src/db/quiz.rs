use color_eyre::{eyre::eyre, Result};
use libsql::params;

use super::helpers::{query_all, query_optional};
use super::models::{QuizRecord, QuizRow};
use super::Db;
use crate::domain::quiz::QuizFields;
use crate::names;

const QUIZ_COLUMNS: &str = r#"
    q.id AS id,
    q.title AS title,
    q.description AS description,
    q.tags AS tags,
    q.status AS status,
    q.permalink AS permalink,
    q.deleted AS deleted,
    q.author_id AS author_id,
    (SELECT COUNT(*) FROM questions WHERE quiz_id = q.id) AS questions_count
"#;

impl Db {
    /// Insert a new draft quiz and return the stored record.
    pub async fn create_quiz(&self, fields: &QuizFields, author_id: i64) -> Result<QuizRecord> {
        let conn = self.db.connect()?;
        let quiz_id = conn
            .query(
                "INSERT INTO quizzes (title, description, tags, author_id) VALUES (?, ?, ?, ?) RETURNING id",
                params![
                    fields.title.as_str(),
                    fields.description.clone(),
                    tags_json(&fields.tags)?,
                    author_id
                ],
            )
            .await?
            .next()
            .await?
            .ok_or_else(|| eyre!("could not get quiz id"))?
            .get::<i64>(0)?;

        tracing::info!("new quiz created with id: {quiz_id} for author_id: {author_id}");
        self.load_quiz(quiz_id)
            .await?
            .ok_or_else(|| eyre!("quiz {quiz_id} vanished right after insert"))
    }

    pub async fn load_quiz(&self, quiz_id: i64) -> Result<Option<QuizRecord>> {
        let conn = self.db.connect()?;
        let sql = format!("SELECT {QUIZ_COLUMNS} FROM quizzes q WHERE q.id = ?");
        let row: Option<QuizRow> = query_optional(&conn, &sql, params![quiz_id]).await?;
        row.map(QuizRecord::try_from).transpose()
    }

    pub async fn load_quiz_by_permalink(&self, permalink: &str) -> Result<Option<QuizRecord>> {
        let conn = self.db.connect()?;
        let sql = format!("SELECT {QUIZ_COLUMNS} FROM quizzes q WHERE q.permalink = ?");
        let row: Option<QuizRow> = query_optional(&conn, &sql, params![permalink]).await?;
        row.map(QuizRecord::try_from).transpose()
    }

    /// All live (non-deleted) quizzes owned by the given author.
    pub async fn quizzes_by_author(&self, author_id: i64) -> Result<Vec<QuizRecord>> {
        let conn = self.db.connect()?;
        let sql = format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes q WHERE q.author_id = ? AND q.deleted = 0 ORDER BY q.id"
        );
        let rows: Vec<QuizRow> = query_all(&conn, &sql, params![author_id]).await?;
        rows.into_iter().map(QuizRecord::try_from).collect()
    }

    /// Overwrite the author-editable fields of a quiz. Lifecycle checks
    /// happen in the domain layer before this is called.
    pub async fn update_quiz_fields(&self, quiz_id: i64, fields: &QuizFields) -> Result<bool> {
        let conn = self.db.connect()?;
        let affected = conn
            .execute(
                "UPDATE quizzes SET title = ?, description = ?, tags = ? WHERE id = ?",
                params![
                    fields.title.as_str(),
                    fields.description.clone(),
                    tags_json(&fields.tags)?,
                    quiz_id
                ],
            )
            .await?;

        tracing::info!("quiz updated with id: {quiz_id}");
        Ok(affected == 1)
    }

    /// Publish a quiz: flip it to active and assign a fresh permalink drawn
    /// from `next_permalink`.
    ///
    /// The permalink column carries a unique index, so a colliding draw
    /// fails the UPDATE; we retry with a fresh token up to the attempt cap.
    pub async fn publish_quiz(
        &self,
        quiz_id: i64,
        mut next_permalink: impl FnMut() -> String + Send,
    ) -> Result<QuizRecord> {
        let conn = self.db.connect()?;

        for attempt in 1..=names::PERMALINK_MAX_ATTEMPTS {
            let permalink = next_permalink();
            let result = conn
                .execute(
                    "UPDATE quizzes SET status = 'active', permalink = ? WHERE id = ?",
                    params![permalink.as_str(), quiz_id],
                )
                .await;

            match result {
                Ok(_) => {
                    tracing::info!("quiz {quiz_id} published with permalink {permalink}");
                    return self
                        .load_quiz(quiz_id)
                        .await?
                        .ok_or_else(|| eyre!("quiz {quiz_id} vanished during publish"));
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(
                        "permalink collision on attempt {attempt} for quiz {quiz_id}, redrawing"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(eyre!(
            "could not assign a unique permalink after {} attempts",
            names::PERMALINK_MAX_ATTEMPTS
        ))
    }

    /// Soft-delete: the row survives and its permalink stays reserved.
    pub async fn soft_delete_quiz(&self, quiz_id: i64) -> Result<bool> {
        let conn = self.db.connect()?;
        let affected = conn
            .execute("UPDATE quizzes SET deleted = 1 WHERE id = ?", params![quiz_id])
            .await?;

        tracing::info!("quiz soft-deleted with id: {quiz_id}");
        Ok(affected == 1)
    }
}

/// SQLITE_CONSTRAINT covers the UNIQUE index on `permalink`; the status
/// UPDATE touches no other constrained column. The local backend reports
/// extended codes (low byte is the primary code), the remote backend its own
/// code pair, and anything else falls back to a message check.
fn is_unique_violation(err: &libsql::Error) -> bool {
    const SQLITE_CONSTRAINT: i32 = 19;
    match err {
        libsql::Error::SqliteFailure(code, _) => code & 0xff == SQLITE_CONSTRAINT,
        libsql::Error::RemoteSqliteFailure(code, _, _) => code & 0xff == SQLITE_CONSTRAINT,
        other => other.to_string().contains("UNIQUE constraint failed"),
    }
}

fn tags_json(tags: &Option<Vec<String>>) -> Result<Option<String>> {
    Ok(match tags {
        Some(tags) => Some(serde_json::to_string(tags)?),
        None => None,
    })
}
