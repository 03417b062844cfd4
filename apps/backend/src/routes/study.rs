//! Study session endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use quiz_core::{mastery_rate, AdvanceOutcome, AnswerOutcome, CardPhase, StudySession};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::routes::owned_deck;
use crate::sessions::ActiveSession;
use crate::AppState;

fn phase_name(phase: CardPhase) -> &'static str {
    match phase {
        CardPhase::Prompt => "prompt",
        CardPhase::Retype => "retype",
        CardPhase::Revealed => "revealed",
    }
}

fn study_view(deck_id: Uuid, session: &StudySession<Database>) -> StudyView {
    StudyView {
        deck_id,
        round: session.round(),
        position: session.position(),
        total: session.working_set_len(),
        correct: session.correct_tally(),
        incorrect: session.incorrect_tally(),
        completed: session.completed(),
        phase: phase_name(session.phase()).to_string(),
        prompt: session.prompt().map(str::to_string),
        choices: session.choices().to_vec(),
        mastery_rate: mastery_rate(session.deck_size(), session.status_map()),
    }
}

/// Look up the caller's active session for a deck; it must be a study
/// session, not a test.
fn study_entry(
    state: &AppState,
    user_id: Uuid,
    deck_id: Uuid,
) -> Result<Arc<AsyncMutex<ActiveSession>>> {
    state
        .sessions
        .get(user_id, deck_id)
        .ok_or_else(|| ApiError::NotFound(format!("no active session for deck {deck_id}")))
}

fn as_study(session: &mut ActiveSession) -> Result<&mut StudySession<Database>> {
    match session {
        ActiveSession::Study(study) => Ok(study),
        ActiveSession::Test(_) => Err(ApiError::BadRequest(
            "a test session is active for this deck".to_string(),
        )),
    }
}

/// POST /api/decks/{deck_id}/study
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<StudyStartRequest>,
) -> Result<Json<StudyView>> {
    let db_deck = owned_deck(&state, auth.user_id, deck_id).await?;
    let deck = state.db.load_deck(&db_deck).await?;

    let session = StudySession::start(
        (*state.db).clone(),
        &deck,
        &auth.user_id.to_string(),
        req.to_options(),
    )
    .await?;

    let view = study_view(deck_id, &session);
    state
        .sessions
        .insert(auth.user_id, deck_id, ActiveSession::Study(session));

    tracing::info!(deck_id = %deck_id, mode = ?req.mode, "started study session");

    Ok(Json(view))
}

/// GET /api/decks/{deck_id}/study
pub async fn view(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<StudyView>> {
    let entry = study_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_study(&mut guard)?;

    Ok(Json(study_view(deck_id, session)))
}

/// POST /api/decks/{deck_id}/study/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerOutcome>> {
    let entry = study_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_study(&mut guard)?;

    let outcome = session.answer(&req.answer).await?;
    Ok(Json(outcome))
}

/// POST /api/decks/{deck_id}/study/retype
pub async fn retype(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<RetypeRequest>,
) -> Result<Json<RetypeResponse>> {
    let entry = study_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_study(&mut guard)?;

    let accepted = session.retype(&req.answer)?;
    Ok(Json(RetypeResponse { accepted }))
}

/// POST /api/decks/{deck_id}/study/advance
pub async fn advance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<AdvanceOutcome>> {
    let entry = study_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_study(&mut guard)?;

    let outcome = session.advance().await?;
    Ok(Json(outcome))
}

/// POST /api/decks/{deck_id}/study/reset
pub async fn reset(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<StudyView>> {
    let entry = study_entry(&state, auth.user_id, deck_id)?;
    let mut guard = entry.lock().await;
    let session = as_study(&mut guard)?;

    session.reset().await?;
    tracing::info!(deck_id = %deck_id, "study progress reset");

    Ok(Json(study_view(deck_id, session)))
}

/// DELETE /api/decks/{deck_id}/study
pub async fn abandon(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(deck_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(auth.user_id, deck_id);
    Ok(StatusCode::NO_CONTENT)
}
