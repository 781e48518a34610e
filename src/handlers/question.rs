use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::quiz::load_owned_quiz;
use crate::{
    domain::{self, quiz::QuizStatus, DomainError},
    extractors::AuthGuard,
    models::{PublicQuestionView, QuestionBody, QuestionView},
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quizzes/{quiz_id}/questions",
            post(create_question).get(list_questions),
        )
        .route(
            "/quizzes/{quiz_id}/questions/{question_id}",
            get(get_question)
                .patch(update_question)
                .delete(delete_question),
        )
}

async fn create_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Json(body): Json<QuestionBody>,
) -> Result<Json<Value>, AppError> {
    let validated = domain::question::validate(&body.title, &body.options)?;

    let quiz = load_owned_quiz(&state, quiz_id, user.id).await?;
    domain::quiz::authorize_question_create(quiz.state())?;

    let question = state
        .db
        .create_question(quiz_id, &validated)
        .await
        .reject("failed to create question")?;

    Ok(Json(json!({
        "status": "success",
        "question": QuestionView::from(question),
    })))
}

/// Question listing hides correctness flags even from the author; the
/// editing views fetch single questions instead. Draft quizzes are only
/// listable by their author.
async fn list_questions(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let quiz = state
        .db
        .load_quiz(quiz_id)
        .await
        .reject("failed to load quiz")?
        .filter(|quiz| !quiz.deleted)
        .ok_or(DomainError::NotFound("Quiz"))?;

    if quiz.status != QuizStatus::Active && quiz.author_id != user.id {
        return Err(DomainError::Forbidden(
            "You do not have permission to access this quiz.",
        )
        .into());
    }

    let questions = state
        .db
        .load_questions(quiz_id)
        .await
        .reject("failed to load questions")?;
    let questions: Vec<PublicQuestionView> =
        questions.into_iter().map(PublicQuestionView::from).collect();

    Ok(Json(json!({
        "status": "success",
        "questions": questions,
        "quizTitle": quiz.title,
        "author": quiz.author_id,
    })))
}

/// Single-question fetch: the author gets the full record (they edit with
/// it); anyone else gets the public view, and only once the quiz is live.
async fn get_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    let quiz = state
        .db
        .load_quiz(quiz_id)
        .await
        .reject("failed to load quiz")?
        .filter(|quiz| !quiz.deleted)
        .ok_or(DomainError::NotFound("Quiz"))?;

    let question = state
        .db
        .load_question(quiz_id, question_id)
        .await
        .reject("failed to load question")?
        .ok_or(DomainError::NotFound("Question"))?;

    let question = if quiz.author_id == user.id {
        json!(QuestionView::from(question))
    } else if quiz.status == QuizStatus::Active {
        json!(PublicQuestionView::from(question))
    } else {
        return Err(DomainError::Forbidden(
            "You do not have permission to access this quiz.",
        )
        .into());
    };

    Ok(Json(json!({
        "status": "success",
        "question": question,
    })))
}

async fn update_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
    Json(body): Json<QuestionBody>,
) -> Result<Json<Value>, AppError> {
    let validated = domain::question::validate(&body.title, &body.options)?;

    let quiz = load_owned_quiz(&state, quiz_id, user.id).await?;
    domain::quiz::authorize_question_mutation(quiz.state())?;

    let updated = state
        .db
        .update_question(quiz_id, question_id, &validated)
        .await
        .reject("failed to update question")?;
    if !updated {
        return Err(DomainError::NotFound("Question").into());
    }

    let question = state
        .db
        .load_question(quiz_id, question_id)
        .await
        .reject("failed to load question")?
        .ok_or(DomainError::NotFound("Question"))?;

    Ok(Json(json!({
        "status": "success",
        "question": QuestionView::from(question),
    })))
}

async fn delete_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    let quiz = load_owned_quiz(&state, quiz_id, user.id).await?;
    domain::quiz::authorize_question_mutation(quiz.state())?;

    let deleted = state
        .db
        .delete_question(quiz_id, question_id)
        .await
        .reject("failed to delete question")?;
    if !deleted {
        return Err(DomainError::NotFound("Question").into());
    }

    Ok(Json(json!({ "status": "success" })))
}
