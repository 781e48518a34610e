use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    db::models::QuizRecord,
    domain::{self, quiz::QuizPatch, DomainError},
    extractors::AuthGuard,
    models::{CreateQuizBody, PublicQuestionView, QuizView, SubmissionBody},
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", post(create_quiz).get(list_quizzes))
        .route(
            "/quizzes/{quiz_id}",
            get(get_quiz).patch(update_quiz).delete(delete_quiz),
        )
        .route("/quizzes/{quiz_id}/publish", patch(publish_quiz))
        .route("/quizzes/{quiz_id}/play/result", post(submit_result))
        .route("/play/{permalink}", get(play_quiz))
}

async fn create_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Json(body): Json<CreateQuizBody>,
) -> Result<Json<Value>, AppError> {
    let fields = domain::quiz::new_quiz(&body.title, body.description, body.tags)?;
    let quiz = state
        .db
        .create_quiz(&fields, user.id)
        .await
        .reject("failed to create quiz")?;

    Ok(Json(json!({
        "status": "success",
        "quiz": QuizView::from(quiz),
    })))
}

async fn list_quizzes(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let quizzes = state
        .db
        .quizzes_by_author(user.id)
        .await
        .reject("failed to list quizzes")?;
    let count = quizzes.len();
    let quizzes: Vec<QuizView> = quizzes.into_iter().map(QuizView::from).collect();

    Ok(Json(json!({
        "status": "success",
        "quizzes": quizzes,
        "count": count,
    })))
}

/// Public-safe quiz view: the embedded questions never carry `correct`.
async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let quiz = load_live_quiz(&state, quiz_id).await?;
    let questions = state
        .db
        .load_questions(quiz_id)
        .await
        .reject("failed to load questions")?;
    let questions: Vec<PublicQuestionView> =
        questions.into_iter().map(PublicQuestionView::from).collect();

    let mut quiz = serde_json::to_value(QuizView::from(quiz))
        .reject("failed to serialize quiz")?;
    quiz["questions"] = json!(questions);

    Ok(Json(json!({
        "status": "success",
        "quiz": quiz,
    })))
}

async fn update_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Json(patch): Json<QuizPatch>,
) -> Result<Json<Value>, AppError> {
    let quiz = load_owned_quiz(&state, quiz_id, user.id).await?;

    let current = domain::quiz::QuizFields {
        title: quiz.title.clone(),
        description: quiz.description.clone(),
        tags: quiz.tags.clone(),
    };
    let fields = domain::quiz::apply_update(quiz.state(), current, patch)?;

    state
        .db
        .update_quiz_fields(quiz_id, &fields)
        .await
        .reject("failed to update quiz")?;
    let updated = load_owned_quiz(&state, quiz_id, user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "quiz": QuizView::from(updated),
    })))
}

async fn publish_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let quiz = load_owned_quiz(&state, quiz_id, user.id).await?;
    domain::quiz::authorize_publish(quiz.state())?;

    let published = state
        .db
        .publish_quiz(quiz_id, || {
            domain::quiz::new_permalink(&mut rand::thread_rng())
        })
        .await
        .reject("failed to publish quiz")?;

    Ok(Json(json!({
        "status": "success",
        "quiz": QuizView::from(published),
    })))
}

async fn delete_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    load_owned_quiz(&state, quiz_id, user.id).await?;
    let deleted = state
        .db
        .soft_delete_quiz(quiz_id)
        .await
        .reject("failed to delete quiz")?;
    if !deleted {
        return Err(DomainError::NotFound("Quiz").into());
    }

    Ok(Json(json!({ "status": "success" })))
}

/// Anonymous play entry point, addressed by permalink.
async fn play_quiz(
    State(state): State<AppState>,
    Path(permalink): Path<String>,
) -> Result<Json<Value>, AppError> {
    let quiz = state
        .db
        .load_quiz_by_permalink(&permalink)
        .await
        .reject("failed to load quiz")?
        .filter(|quiz| !quiz.deleted)
        .ok_or(DomainError::NotFound("Quiz"))?;

    let questions = state
        .db
        .load_questions(quiz.id)
        .await
        .reject("failed to load questions")?;
    let questions: Vec<PublicQuestionView> =
        questions.into_iter().map(PublicQuestionView::from).collect();

    Ok(Json(json!({
        "status": "success",
        "questions": questions,
        "quizTitle": quiz.title,
        "author": quiz.author_id,
        "quizId": quiz.id,
    })))
}

/// Grade an anonymous submission. Pure read: no stored state changes.
async fn submit_result(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Json(body): Json<SubmissionBody>,
) -> Result<Json<Value>, AppError> {
    let quiz = state
        .db
        .load_quiz(quiz_id)
        .await
        .reject("failed to load quiz")?
        .ok_or(DomainError::NotFound("Quiz"))?;

    let questions = state
        .db
        .load_questions(quiz_id)
        .await
        .reject("failed to load questions")?;
    let option_sets: Vec<&[_]> = questions.iter().map(|q| q.options.as_slice()).collect();

    let result = domain::scoring::score(quiz.state(), &option_sets, &body.answers)?;

    Ok(Json(json!({
        "status": "success",
        "total": result.total,
        "correct": result.correct,
    })))
}

/// Load a quiz that still exists from a reader's point of view.
async fn load_live_quiz(state: &AppState, quiz_id: i64) -> Result<QuizRecord, AppError> {
    state
        .db
        .load_quiz(quiz_id)
        .await
        .reject("failed to load quiz")?
        .filter(|quiz| !quiz.deleted)
        .ok_or_else(|| DomainError::NotFound("Quiz").into())
}

/// Load a quiz and check authorship for a mutating operation.
pub(super) async fn load_owned_quiz(
    state: &AppState,
    quiz_id: i64,
    user_id: i64,
) -> Result<QuizRecord, AppError> {
    let quiz = state
        .db
        .load_quiz(quiz_id)
        .await
        .reject("failed to load quiz")?
        .ok_or(DomainError::NotFound("Quiz"))?;

    if quiz.author_id != user_id {
        return Err(DomainError::Forbidden(
            "You do not have enough permission to access this resource.",
        )
        .into());
    }

    Ok(quiz)
}
