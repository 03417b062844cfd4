//! Test session endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use quiz_core::test_mode::TestAnswerOutcome;
use quiz_core::{QuestionKind, TestSession, TestSummary};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::owned_deck;
use crate::sessions::ActiveSession;
use crate::AppState;

fn kind_name(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Typing => "typing",
        QuestionKind::Choice => "choice",
    }
}

fn test_view(deck_id: Uuid, session: &TestSession<Database>) -> TestView {
    let question = session.current_question();
    TestView {
        deck_id,
        position: session.position(),
        total: session.len(),
        finished: session.finished(),
        kind: question.map(|q| kind_name(q.kind).to_string()),
        prompt: question.map(|q| q.card.question.clone()),
        choices: question.map(|q| q.choices.clone()).unwrap_or_default(),
        correct: session.correct_tally(),
        incorrect: session.incorrect_tally(),
    }
}

fn test_entry(
    state: &AppState,
    user_id: Uuid,
    deck_id: Uuid,
) -> Result<Arc<AsyncMutex<ActiveSession>>> {
    state
        .sessions
        .get(user_id, deck_id)
        .ok_or_else(|| ApiError::NotFound(format!("no active session for deck {deck_id}")))
}

fn as_test(session: &mut ActiveSession) -> Result<&mut TestSession<Database>> {
    match session {
        ActiveSession::Test(test) => Ok(test),
        ActiveSession::Study(_) => Err(ApiError::BadRequest(
            "a study session is active for this deck".to_string(),
        )),
    }
}

/// POST /api/decks/{deck_id}/test
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<TestStartRequest>,
) -> Result<Json<TestView>> {
    let db_deck = owned_deck(&state, auth.user_id, deck_id).await?;
    let deck = state.db.load_deck(&db_deck).await?;

    let session = TestSession::start(
        (*state.db).clone(),
        &deck,
        &auth.user_id.to_string(),
        req.question_count,
        req.typing_ratio,
    )?;

    let view = test_view(deck_id, &session);
    state
        .sessions
        .insert(auth.user_id, deck_id, ActiveSession::Test(session));

    tracing::info!(
        deck_id = %deck_id,
        questions = view.total,
        "started test session"
    );

    Ok(Json(view))
}

/// GET /api/decks/{deck_id}/test
pub async fn view(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<TestView>> {
    let entry = test_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_test(&mut guard)?;

    Ok(Json(test_view(deck_id, session)))
}

/// POST /api/decks/{deck_id}/test/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<TestAnswerOutcome>> {
    let entry = test_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_test(&mut guard)?;

    let outcome = session.answer(&req.answer)?;
    Ok(Json(outcome))
}

/// POST /api/decks/{deck_id}/test/advance
pub async fn advance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<TestAdvanceResponse>> {
    let entry = test_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_test(&mut guard)?;

    let more = session.advance()?;
    Ok(Json(TestAdvanceResponse { finished: !more }))
}

/// POST /api/decks/{deck_id}/test/submit
///
/// The single persistence point of a test. A store failure surfaces here
/// and leaves the session in place so the client can retry.
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<TestSummary>> {
    let entry = test_entry(&state, auth.user_id, deck_id)?;
    let summary = {
        let mut guard = entry.lock().await;
        let session = as_test(&mut guard)?;
        session.submit().await?
    };

    state.sessions.remove(auth.user_id, deck_id);

    tracing::info!(deck_id = %deck_id, score = summary.score, "test submitted");

    Ok(Json(summary))
}

/// DELETE /api/decks/{deck_id}/test
pub async fn abandon(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(auth.user_id, deck_id);
    Ok(StatusCode::NO_CONTENT)
}
